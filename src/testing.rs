//! Testing utilities for code built on validation chains
//!
//! Assertion macros check how many outcomes of each category a tracker holds
//! for an entity. They accept anything that is `AsRef<ResultTracker>`: a
//! tracker, a reference to one, or a chain.
//!
//! # Examples
//!
//! ```rust
//! use fathom::{assert_failed, assert_passed, Checker, ValidationChain};
//!
//! let mut chain = ValidationChain::of("age", 17).accumulating();
//! chain.is(|a: &i32| *a > 0, "age.positive").unwrap();
//! chain.is(|a: &i32| *a >= 18, "age.adult").unwrap();
//!
//! assert_passed!(chain, "age", 1);
//! assert_failed!(chain, "age", 1);
//! ```
//!
//! With the `proptest` feature, [`ResultTracker`], [`Outcome`] and
//! [`Category`] implement `Arbitrary`.

use crate::tracker::{Category, ResultTracker};
#[cfg(feature = "proptest")]
use crate::tracker::Outcome;

/// Number of `category` outcomes recorded for `name`; zero for unknown names.
pub fn recorded(tracker: &ResultTracker, name: &str, category: Category) -> usize {
    tracker
        .outcomes(name)
        .map_or(0, |outcomes| outcomes.get(category).len())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __assert_recorded {
    ($tracker:expr, $name:expr, $count:expr, $category:expr) => {
        match &$tracker {
            source => {
                let tracker: &$crate::ResultTracker = ::std::convert::AsRef::as_ref(source);
                let name: &str = $name;
                let expected: usize = $count;
                let actual = $crate::testing::recorded(tracker, name, $category);
                if actual != expected {
                    panic!(
                        "Expected {} {} outcome(s) for `{}`, found {}: {:?}",
                        expected,
                        $category,
                        name,
                        actual,
                        tracker.outcomes(name)
                    );
                }
            }
        }
    };
}

/// Assert the number of failed outcomes recorded for an entity.
///
/// ```rust
/// use fathom::{assert_failed, Category, Outcome, ResultTracker};
///
/// let mut tracker = ResultTracker::new();
/// tracker.record(Category::Failed, "root", Outcome::new("k", "text"));
/// assert_failed!(tracker, "root", 1);
/// ```
#[macro_export]
macro_rules! assert_failed {
    ($tracker:expr, $name:expr, $count:expr) => {
        $crate::__assert_recorded!($tracker, $name, $count, $crate::Category::Failed)
    };
}

/// Assert the number of passed outcomes recorded for an entity.
#[macro_export]
macro_rules! assert_passed {
    ($tracker:expr, $name:expr, $count:expr) => {
        $crate::__assert_recorded!($tracker, $name, $count, $crate::Category::Passed)
    };
}

/// Assert the number of skipped outcomes recorded for an entity.
#[macro_export]
macro_rules! assert_skipped {
    ($tracker:expr, $name:expr, $count:expr) => {
        $crate::__assert_recorded!($tracker, $name, $count, $crate::Category::Skipped)
    };
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for Category {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(Category::Failed),
            Just(Category::Passed),
            Just(Category::Skipped),
        ]
        .boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for Outcome {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        ("[a-z]{1,6}(\\.[a-z]{1,6})?", "[ -~]{0,16}")
            .prop_map(|(key, text)| Outcome::new(key, text))
            .boxed()
    }
}

#[cfg(feature = "proptest")]
impl Arbitrary for ResultTracker {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop::collection::vec(
            (
                any::<Category>(),
                prop_oneof![Just("root"), Just("root.user"), Just("root.user.name")],
                any::<Outcome>(),
            ),
            0..12,
        )
        .prop_map(|records| {
            let mut tracker = ResultTracker::new();
            for (category, name, outcome) in records {
                tracker.record(category, name, outcome);
            }
            tracker
        })
        .boxed()
    }
}
