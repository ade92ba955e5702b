//! Predicate trait and negation
//!
//! A [`Predicate`] is the unit a chain evaluates. Closures `Fn(&T) -> bool`
//! are predicates, so most call sites never name the trait. [`Not`] is the
//! one combinator the chain itself needs: `is_not(p, m)` is `is(Not(p), m)`.
//!
//! # Example
//!
//! ```rust
//! use fathom::predicate::{Not, Predicate};
//!
//! let adult = |age: &u32| *age >= 18;
//! assert!(adult.check(&21));
//! assert!(Not(adult).check(&17));
//! ```

/// A check over values of type `T`.
pub trait Predicate<T: ?Sized> {
    /// Check if the value satisfies this predicate.
    fn check(&self, value: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    #[inline]
    fn check(&self, value: &T) -> bool {
        self(value)
    }
}

/// Inverts a predicate.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        !self.0.check(value)
    }
}
