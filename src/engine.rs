//! The filter/aggregate engine shared by every dashboard.
//!
//! A dashboard is described by a [`View`]: which records it shows, what its
//! criteria look like, how a record is matched and what summary it reports.
//! [`evaluate`] runs a view over a record slice and is a pure function of its
//! inputs; calling it twice with the same records and criteria gives the
//! same output.
//!
//! Criteria axes are combined with logical AND. Each axis has a pass-through
//! default (`Choice::All`, a zero minimum, an empty search term, a `false`
//! toggle) so that `V::Criteria::default()` matches every record.

use std::borrow::Borrow;

use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A categorical filter axis: either the wildcard or one exact value.
///
/// On the wire the wildcard is the string `"all"` in any case, so a value
/// literally named "All" deserializes to the wildcard and cannot be selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Choice<T> {
    All,
    Only(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq> Choice<T> {
    /// Whether `value` passes this axis.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }

    /// Whether at least one of `values` passes this axis.
    ///
    /// The wildcard admits even an empty sequence.
    pub fn admits_any<I>(&self, values: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => values.into_iter().any(|v| v.borrow() == wanted),
        }
    }

    /// Whether this axis is the wildcard.
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl Choice<String> {
    /// String-keyed axis check without allocating.
    pub fn admits_str(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

/// `"all"` (any case) is the wildcard; anything else must parse as `T`.
impl<'de, T> Deserialize<'de> for Choice<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case("all") {
            return Ok(Choice::All);
        }
        let value = T::deserialize(<String as IntoDeserializer<'de, D::Error>>::into_deserializer(raw))?;
        Ok(Choice::Only(value))
    }
}

impl<T: Serialize> Serialize for Choice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Choice::All => serializer.serialize_str("all"),
            Choice::Only(value) => value.serialize(serializer),
        }
    }
}

/// Case-insensitive substring match against any of `fields`.
///
/// The term is used as typed: surrounding whitespace is part of the
/// substring. Only the empty term matches everything.
pub fn matches_search<'a, I>(term: &str, fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Inclusive lower bound.
pub fn at_least<N: PartialOrd>(value: N, minimum: N) -> bool {
    value >= minimum
}

/// A single dashboard's filtering and summary rules.
pub trait View {
    /// Short name used in logs.
    const NAME: &'static str;

    type Record: Clone;
    type Criteria: Default + Clone + PartialEq;
    type Summary;

    /// Whether `record` passes every axis of `criteria`.
    fn matches(&self, criteria: &Self::Criteria, record: &Self::Record) -> bool;

    /// Summary statistics. `all` is the unfiltered input and `visible` the
    /// filtered subset, so a view can aggregate over either.
    fn summarize(&self, all: &[Self::Record], visible: &[Self::Record]) -> Self::Summary;
}

/// Output of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewOutput<R, S> {
    /// Records passing the criteria, in input order.
    pub visible: Vec<R>,
    pub summary: S,
}

/// Records passing `criteria`, in input order.
pub fn filter<V: View>(view: &V, records: &[V::Record], criteria: &V::Criteria) -> Vec<V::Record> {
    records
        .iter()
        .filter(|record| view.matches(criteria, record))
        .cloned()
        .collect()
}

/// Filter then summarize.
pub fn evaluate<V: View>(
    view: &V,
    records: &[V::Record],
    criteria: &V::Criteria,
) -> ViewOutput<V::Record, V::Summary> {
    let visible = filter(view, records, criteria);
    let summary = view.summarize(records, &visible);
    ViewOutput { visible, summary }
}
