//! Aggregation primitives behind the dashboard KPI cards.
//!
//! Every ratio in this module is zero-safe: an empty denominator yields 0
//! rather than NaN, so summaries over empty record lists stay displayable.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

/// Share of deliveries that were not delayed, in percent.
///
/// `delayed` greater than `total` is treated as all delayed.
pub fn on_time_rate(total: usize, delayed: usize) -> f64 {
    percentage(total.saturating_sub(delayed), total)
}

/// Clamp a percentage into `[0, 100]`. NaN maps to 0.
pub fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Arithmetic mean, or 0 for an empty sequence.
pub fn average<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}

/// Number of records satisfying `pred`.
pub fn count_where<R, F>(records: &[R], pred: F) -> usize
where
    F: Fn(&R) -> bool,
{
    records.iter().filter(|r| pred(r)).count()
}

/// Number of distinct keys among records satisfying `pred`.
pub fn distinct_count<R, P, F>(records: &[R], pred: P, key: F) -> usize
where
    P: Fn(&R) -> bool,
    F: Fn(&R) -> &str,
{
    records
        .iter()
        .filter(|r| pred(r))
        .map(key)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Distinct values of a key in first-seen order.
pub fn distinct_values<R, F>(records: &[R], key: F) -> Vec<String>
where
    F: Fn(&R) -> &str,
{
    let mut seen = BTreeSet::new();
    records
        .iter()
        .map(key)
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

/// Per-group tally produced by [`rank_groups`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    /// Grouping key (e.g. store id).
    pub key: String,
    /// Display label taken from the first record of the group.
    pub label: String,
    /// Records in the group.
    pub count: usize,
    /// Records in the group satisfying the secondary predicate.
    pub flagged: usize,
}

/// Group the records satisfying `include` by key, count each group and the
/// members satisfying `flagged`, then rank groups by flagged count
/// descending, total count descending, key ascending, and keep the first
/// `top_k`.
pub fn rank_groups<R, I, K, L, F>(
    records: &[R],
    include: I,
    key: K,
    label: L,
    flagged: F,
    top_k: usize,
) -> Vec<GroupCount>
where
    I: Fn(&R) -> bool,
    K: Fn(&R) -> &str,
    L: Fn(&R) -> &str,
    F: Fn(&R) -> bool,
{
    // BTreeMap keeps the final tie-break on key stable across runs.
    let mut groups: BTreeMap<&str, GroupCount> = BTreeMap::new();

    for record in records.iter().filter(|r| include(r)) {
        let entry = groups.entry(key(record)).or_insert_with(|| GroupCount {
            key: key(record).to_string(),
            label: label(record).to_string(),
            count: 0,
            flagged: 0,
        });
        entry.count += 1;
        if flagged(record) {
            entry.flagged += 1;
        }
    }

    let mut ranked: Vec<GroupCount> = groups.into_values().collect();
    ranked.sort_by(|a, b| {
        b.flagged
            .cmp(&a.flagged)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.key.cmp(&b.key))
    });
    ranked.truncate(top_k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_zero_denominator() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn test_on_time_rate() {
        assert_eq!(on_time_rate(0, 0), 0.0);
        let rate = on_time_rate(192, 27);
        assert!((rate - 85.9375).abs() < 1e-9);
        assert_eq!(on_time_rate(10, 12), 0.0);
    }

    #[test]
    fn test_average_empty() {
        assert_eq!(average(Vec::<f64>::new()), 0.0);
        assert_eq!(average([95.0, 78.0, 65.0]), 238.0 / 3.0);
    }

    #[test]
    fn test_clamp_percentage() {
        assert_eq!(clamp_percentage(-5.0), 0.0);
        assert_eq!(clamp_percentage(150.0), 100.0);
        assert_eq!(clamp_percentage(f64::NAN), 0.0);
        assert_eq!(clamp_percentage(42.5), 42.5);
    }

    #[test]
    fn test_distinct_count_and_values() {
        let records = vec![("A", true), ("B", false), ("A", true), ("C", true)];
        assert_eq!(distinct_count(&records, |r| r.1, |r| r.0), 2);
        assert_eq!(distinct_values(&records, |r| r.0), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rank_groups_tie_break() {
        // (store, flagged)
        let records = vec![
            ("B", true),
            ("B", false),
            ("A", true),
            ("C", false),
            ("B", false),
            ("A", false),
            ("C", false),
        ];
        let ranked = rank_groups(&records, |_| true, |r| r.0, |r| r.0, |r| r.1, 10);

        let keys: Vec<&str> = ranked.iter().map(|g| g.key.as_str()).collect();
        // A and B tie on flagged; B wins on count.
        assert_eq!(keys, vec!["B", "A", "C"]);
        assert_eq!(ranked[0].count, 3);
        assert_eq!(ranked[0].flagged, 1);
    }

    #[test]
    fn test_rank_groups_truncates_and_filters() {
        let records = vec![("A", true), ("B", true), ("C", true), ("D", false)];
        let ranked = rank_groups(&records, |r| r.1, |r| r.0, |r| r.0, |r| r.1, 2);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|g| g.key != "D"));
    }

    #[test]
    fn test_rank_groups_empty() {
        let records: Vec<(&str, bool)> = vec![];
        assert!(rank_groups(&records, |_| true, |r| r.0, |r| r.0, |r| r.1, 3).is_empty());
    }
}
