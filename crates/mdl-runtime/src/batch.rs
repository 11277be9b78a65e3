#![forbid(unsafe_code)]

//! Ordered property batches.
//!
//! A [`Batch`] is applied as one transaction by
//! [`MarkdownLabel::apply_batch`](crate::MarkdownLabel::apply_batch): every
//! name is checked before anything changes, style-only entries land in order,
//! and any number of structure entries arm a single rebuild.

use mdl_core::value::PropertyValue;

use crate::scheduler::RequestOutcome;

/// Property assignments in application order.
///
/// A name may appear more than once; the last assignment wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    entries: Vec<(String, PropertyValue)>,
}

impl Batch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an assignment.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.entries.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Batch {
    type Item = (String, PropertyValue);
    type IntoIter = std::vec::IntoIter<(String, PropertyValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Batch
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut batch = Self::new();
        for (k, v) in iter {
            batch.push(k, v);
        }
        batch
    }
}

/// What one successful batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Style-only assignments applied in place.
    pub style_applied: usize,
    /// Node updates performed by those assignments, summed.
    pub nodes_updated: usize,
    /// Structure assignments stored.
    pub structure_changed: usize,
    /// The rebuild request made for the structure assignments, if any.
    pub rebuild: Option<RequestOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn requested_rebuild(&self) -> bool {
        self.rebuild.is_some()
    }
}
