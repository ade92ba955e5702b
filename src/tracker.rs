//! Categorized ledger of assertion outcomes
//!
//! Every assertion a chain evaluates (or declines to evaluate) leaves a record
//! in a [`ResultTracker`]. Records are grouped by the name of the checked
//! entity (`"root"`, `"root.user"`, ...) and then by [`Category`].
//!
//! # Examples
//!
//! ```
//! use fathom::{Category, Outcome, ResultTracker};
//!
//! let mut tracker = ResultTracker::new();
//! tracker.record(Category::Passed, "root", Outcome::new("age.set", "age is set"));
//! tracker.record(Category::Failed, "root", Outcome::new("age.adult", "must be 18 or older"));
//!
//! assert!(tracker.has_failures());
//! assert_eq!(tracker.count(Category::Failed), 1);
//! assert_eq!(tracker.outcomes("root").unwrap().passed().len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::Semigroup;

/// The three buckets an assertion outcome can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    /// The predicate evaluated to false.
    Failed,
    /// The predicate evaluated to true.
    Passed,
    /// The predicate was never evaluated because the chain was stopped.
    Skipped,
}

impl Category {
    /// All categories, in reporting order.
    pub const ALL: [Category; 3] = [Category::Failed, Category::Passed, Category::Skipped];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Category::Failed => "failed",
            Category::Passed => "passed",
            Category::Skipped => "skipped",
        };
        f.write_str(label)
    }
}

/// One recorded assertion: the message key it was raised under and the text
/// the renderer produced for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    assertion: String,
    message: String,
}

impl Outcome {
    /// Create an outcome from an assertion key and its rendered message.
    pub fn new(assertion: impl Into<String>, message: impl Into<String>) -> Self {
        Outcome {
            assertion: assertion.into(),
            message: message.into(),
        }
    }

    /// The assertion key (the message catalog key the check was raised with).
    pub fn assertion(&self) -> &str {
        &self.assertion
    }

    /// The rendered, human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Ordered outcome lists for a single entity.
///
/// Insertion order is preserved and structurally identical records are all
/// kept: two failures raised by two different calls are two records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcomes {
    failed: Vec<Outcome>,
    passed: Vec<Outcome>,
    skipped: Vec<Outcome>,
}

impl Outcomes {
    /// Outcomes whose predicate evaluated to false.
    pub fn failed(&self) -> &[Outcome] {
        &self.failed
    }

    /// Outcomes whose predicate evaluated to true.
    pub fn passed(&self) -> &[Outcome] {
        &self.passed
    }

    /// Outcomes that were never evaluated.
    pub fn skipped(&self) -> &[Outcome] {
        &self.skipped
    }

    /// The list for `category`.
    pub fn get(&self, category: Category) -> &[Outcome] {
        match category {
            Category::Failed => &self.failed,
            Category::Passed => &self.passed,
            Category::Skipped => &self.skipped,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<Outcome> {
        match category {
            Category::Failed => &mut self.failed,
            Category::Passed => &mut self.passed,
            Category::Skipped => &mut self.skipped,
        }
    }

    /// True when no outcome of any category has been recorded.
    pub fn is_empty(&self) -> bool {
        self.failed.is_empty() && self.passed.is_empty() && self.skipped.is_empty()
    }
}

impl Semigroup for Outcomes {
    fn combine(self, other: Self) -> Self {
        Outcomes {
            failed: self.failed.combine(other.failed),
            passed: self.passed.combine(other.passed),
            skipped: self.skipped.combine(other.skipped),
        }
    }
}

/// Per-entity ledger of failed, passed and skipped outcomes.
///
/// Merging is lossless and associative (see [`Semigroup`]): every record of
/// every key in the merged tracker is appended to the matching list here,
/// creating the key if needed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ResultTracker {
    entities: BTreeMap<String, Outcomes>,
}

impl ResultTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `outcome` to `name`'s list for `category`.
    pub fn record(&mut self, category: Category, name: &str, outcome: Outcome) {
        self.entities
            .entry(name.to_string())
            .or_default()
            .bucket_mut(category)
            .push(outcome);
    }

    /// Union every category of every key in `other` into this tracker.
    pub fn merge(&mut self, other: ResultTracker) {
        for (name, incoming) in other.entities {
            match self.entities.remove(&name) {
                Some(existing) => {
                    self.entities.insert(name, existing.combine(incoming));
                }
                None => {
                    self.entities.insert(name, incoming);
                }
            }
        }
    }

    /// True iff any entity has at least one failed outcome.
    pub fn has_failures(&self) -> bool {
        self.entities.values().any(|o| !o.failed.is_empty())
    }

    /// Outcomes recorded for `name`, if any.
    pub fn outcomes(&self, name: &str) -> Option<&Outcomes> {
        self.entities.get(name)
    }

    /// Entity names that have at least one record, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// Iterate over `(entity, outcomes)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcomes)> {
        self.entities.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of records in `category` across all entities.
    pub fn count(&self, category: Category) -> usize {
        self.entities.values().map(|o| o.get(category).len()).sum()
    }

    /// The "not checked" report: every skipped `(entity, assertion)` pair.
    pub fn not_checked(&self) -> Vec<(&str, &str)> {
        self.entities
            .iter()
            .flat_map(|(name, o)| {
                o.skipped
                    .iter()
                    .map(move |outcome| (name.as_str(), outcome.assertion()))
            })
            .collect()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entities.values().all(Outcomes::is_empty)
    }
}

impl AsRef<ResultTracker> for ResultTracker {
    fn as_ref(&self) -> &ResultTracker {
        self
    }
}

impl Semigroup for ResultTracker {
    fn combine(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(key: &str) -> Outcome {
        Outcome::new(key, format!("{} rendered", key))
    }

    #[test]
    fn test_record_preserves_order_and_duplicates() {
        let mut tracker = ResultTracker::new();
        tracker.record(Category::Failed, "root", outcome("a"));
        tracker.record(Category::Failed, "root", outcome("b"));
        tracker.record(Category::Failed, "root", outcome("a"));

        let failed = tracker.outcomes("root").unwrap().failed();
        let keys: Vec<_> = failed.iter().map(Outcome::assertion).collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_empty_tracker_has_no_failures() {
        let tracker = ResultTracker::new();
        assert!(!tracker.has_failures());
        assert!(tracker.is_empty());
        assert_eq!(tracker.names().count(), 0);
    }

    #[test]
    fn test_passes_and_skips_are_not_failures() {
        let mut tracker = ResultTracker::new();
        tracker.record(Category::Passed, "root", outcome("a"));
        tracker.record(Category::Skipped, "root", outcome("b"));
        assert!(!tracker.has_failures());
        assert!(!tracker.is_empty());
    }

    #[test]
    fn test_merge_creates_missing_keys() {
        let mut parent = ResultTracker::new();
        parent.record(Category::Failed, "root", outcome("a"));

        let mut child = ResultTracker::new();
        child.record(Category::Passed, "root.user", outcome("b"));

        parent.merge(child);
        assert_eq!(parent.names().collect::<Vec<_>>(), vec!["root", "root.user"]);
        assert_eq!(parent.outcomes("root.user").unwrap().passed().len(), 1);
    }

    #[test]
    fn test_merge_appends_to_existing_keys() {
        let mut a = ResultTracker::new();
        a.record(Category::Skipped, "root", outcome("a"));

        let mut b = ResultTracker::new();
        b.record(Category::Skipped, "root", outcome("a"));
        b.record(Category::Failed, "root", outcome("c"));

        a.merge(b);
        let root = a.outcomes("root").unwrap();
        assert_eq!(root.skipped().len(), 2);
        assert_eq!(root.failed().len(), 1);
    }

    #[test]
    fn test_merge_associativity() {
        let mut a = ResultTracker::new();
        a.record(Category::Failed, "x", outcome("1"));
        let mut b = ResultTracker::new();
        b.record(Category::Failed, "x", outcome("2"));
        b.record(Category::Passed, "y", outcome("3"));
        let mut c = ResultTracker::new();
        c.record(Category::Skipped, "y", outcome("4"));

        let left = a.clone().combine(b.clone()).combine(c.clone());
        let right = a.combine(b.combine(c));
        assert_eq!(left, right);
    }

    #[test]
    fn test_not_checked_lists_skipped_assertions() {
        let mut tracker = ResultTracker::new();
        tracker.record(Category::Skipped, "root", outcome("age.adult"));
        tracker.record(Category::Skipped, "root.user", outcome("name.set"));
        tracker.record(Category::Failed, "root", outcome("other"));

        assert_eq!(
            tracker.not_checked(),
            vec![("root", "age.adult"), ("root.user", "name.set")]
        );
    }

    #[test]
    fn test_count_sums_across_entities() {
        let mut tracker = ResultTracker::new();
        tracker.record(Category::Passed, "a", outcome("1"));
        tracker.record(Category::Passed, "b", outcome("2"));
        tracker.record(Category::Failed, "b", outcome("3"));
        assert_eq!(tracker.count(Category::Passed), 2);
        assert_eq!(tracker.count(Category::Failed), 1);
        assert_eq!(tracker.count(Category::Skipped), 0);
    }

    #[test]
    fn test_category_display() {
        let labels: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["failed", "passed", "skipped"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_tracker_serializes_by_entity() {
        let mut tracker = ResultTracker::new();
        tracker.record(Category::Failed, "root", Outcome::new("age.adult", "too young"));

        let json = serde_json::to_value(&tracker).unwrap();
        assert_eq!(json["root"]["failed"][0]["assertion"], "age.adult");
        assert_eq!(json["root"]["failed"][0]["message"], "too young");
        assert!(json["root"]["passed"].as_array().unwrap().is_empty());
    }
}
