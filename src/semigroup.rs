//! Semigroup trait for associative merging
//!
//! Result accumulation across a tree of chains relies on one law: it must not
//! matter how merges are grouped. A child chain merged into its parent, which
//! is later merged into a grandparent, has to produce the same ledger as
//! merging the grandchild's records directly.
//!
//! # Mathematical Properties
//!
//! ```text
//! a.combine(b).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! # Examples
//!
//! ```
//! use fathom::{Category, Outcome, ResultTracker, Semigroup};
//!
//! let mut a = ResultTracker::new();
//! a.record(Category::Failed, "root", Outcome::new("age.adult", "must be 18 or older"));
//!
//! let mut b = ResultTracker::new();
//! b.record(Category::Passed, "root.user", Outcome::new("name.set", "name is set"));
//!
//! let merged = a.combine(b);
//! assert!(merged.has_failures());
//! assert_eq!(merged.names().count(), 2);
//! ```

/// A type that supports an associative binary operation
///
/// # Laws
///
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
///
/// `combine` takes both operands by value; clone first to keep the originals.
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}
