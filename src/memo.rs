//! Memoized view evaluation.
//!
//! Hosts re-render on every interaction, most of which leave a given view's
//! records and criteria untouched. [`Memoized`] remembers the last evaluation
//! of one view and hands it back while the record slice (by identity) and the
//! criteria (by value) are unchanged.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{View, ViewOutput, evaluate};

/// Output type produced by a memoized view.
pub type SharedOutput<V> = Arc<ViewOutput<<V as View>::Record, <V as View>::Summary>>;

struct CacheEntry<V: View> {
    // Holding the slice keeps its address from being reused by another one.
    records: Arc<[V::Record]>,
    criteria: V::Criteria,
    output: SharedOutput<V>,
}

/// A view plus a single-entry cache of its last output.
pub struct Memoized<V: View> {
    view: V,
    cache: Option<CacheEntry<V>>,
    hits: u64,
    misses: u64,
}

impl<V: View> Memoized<V> {
    pub fn new(view: V) -> Self {
        Self {
            view,
            cache: None,
            hits: 0,
            misses: 0,
        }
    }

    /// Evaluate the view, reusing the previous output when `records` is the
    /// same allocation and `criteria` compares equal.
    pub fn evaluate(
        &mut self,
        records: &Arc<[V::Record]>,
        criteria: &V::Criteria,
    ) -> SharedOutput<V> {
        if let Some(entry) = &self.cache {
            if Arc::ptr_eq(&entry.records, records) && entry.criteria == *criteria {
                self.hits += 1;
                debug!(view = V::NAME, hits = self.hits, "memo hit");
                return Arc::clone(&entry.output);
            }
        }

        self.misses += 1;
        let output = Arc::new(evaluate(&self.view, &records[..], criteria));
        debug!(
            view = V::NAME,
            misses = self.misses,
            visible = output.visible.len(),
            total = records.len(),
            "view evaluated"
        );

        self.cache = Some(CacheEntry {
            records: Arc::clone(records),
            criteria: criteria.clone(),
            output: Arc::clone(&output),
        });
        output
    }

    /// Drop the cached output.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// (hits, misses) since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::at_least;

    struct Threshold;

    impl View for Threshold {
        const NAME: &'static str = "threshold";

        type Record = u32;
        type Criteria = u32;
        type Summary = usize;

        fn matches(&self, criteria: &u32, record: &u32) -> bool {
            at_least(*record, *criteria)
        }

        fn summarize(&self, _all: &[u32], visible: &[u32]) -> usize {
            visible.len()
        }
    }

    #[test]
    fn test_same_inputs_hit_cache() {
        let records: Arc<[u32]> = Arc::from(vec![10, 20, 30]);
        let mut memo = Memoized::new(Threshold);

        let first = memo.evaluate(&records, &15);
        let second = memo.evaluate(&records, &15);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(memo.stats(), (1, 1));
        assert_eq!(second.summary, 2);
    }

    #[test]
    fn test_changed_criteria_recomputes() {
        let records: Arc<[u32]> = Arc::from(vec![10, 20, 30]);
        let mut memo = Memoized::new(Threshold);

        memo.evaluate(&records, &15);
        let out = memo.evaluate(&records, &25);

        assert_eq!(out.visible, vec![30]);
        assert_eq!(memo.stats(), (0, 2));
    }

    #[test]
    fn test_equal_but_distinct_records_recompute() {
        let a: Arc<[u32]> = Arc::from(vec![1, 2, 3]);
        let b: Arc<[u32]> = Arc::from(vec![1, 2, 3]);
        let mut memo = Memoized::new(Threshold);

        let from_a = memo.evaluate(&a, &0);
        let from_b = memo.evaluate(&b, &0);

        assert_eq!(memo.stats(), (0, 2));
        assert_eq!(*from_a, *from_b);
    }

    #[test]
    fn test_invalidate() {
        let records: Arc<[u32]> = Arc::from(vec![1]);
        let mut memo = Memoized::new(Threshold);

        memo.evaluate(&records, &0);
        memo.invalidate();
        memo.evaluate(&records, &0);

        assert_eq!(memo.stats(), (0, 2));
    }
}
