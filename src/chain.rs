//! Validation chains
//!
//! A [`ValidationChain`] wraps one value under test and runs predicates
//! against it. Two independent flags drive every assertion:
//!
//! | `stopped` | `accumulate` | predicate false | predicate true |
//! |-----------|--------------|-----------------|----------------|
//! | false | false | `Err(AssertionFailure)` | nothing recorded |
//! | false | true | failed record | passed record |
//! | true | any | predicate not run, skipped record | predicate not run, skipped record |
//!
//! `stopped` starts out true when the chain has no value and only ever moves
//! from false to true. `accumulate` starts out false and can be toggled at
//! any time.
//!
//! # Child chains
//!
//! [`check_property`](ValidationChain::check_property) resolves a dotted path
//! against the current value and returns a child chain over the result. The
//! child borrows its parent; [`end`](ValidationChain::end) merges the child's
//! tracker into the parent and hands the parent back.
//!
//! ```
//! use fathom::{ArgSource, Checker, ValidationChain, Value};
//!
//! # fn main() -> Result<(), fathom::CheckError> {
//! let doc = Value::map([("user", Value::map([("name", "Ann")]))]);
//! let mut root = ValidationChain::new("root", Some(doc)).accumulating();
//!
//! root.check_property("user", ArgSource::none())?
//!     .expect("user resolves")
//!     .is(|user: &Value| user.as_map().is_some(), "user.is_record")?
//!     .end()?;
//!
//! let user = root.tracker().outcomes("root.user").unwrap();
//! assert_eq!(user.passed().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Specialized checkers
//!
//! Libraries of ready-made assertions wrap a chain and implement [`Checker`],
//! so `is`/`is_not` hand back the specialized type and stay chainable:
//!
//! ```
//! use fathom::{AssertionFailure, Checker, Evaluate, Message, ValidationChain};
//!
//! struct Age<'p>(ValidationChain<'p, u32>);
//!
//! impl<'p> Checker for Age<'p> {
//!     type Subject = u32;
//!
//!     fn chain(&mut self) -> &mut dyn Evaluate<u32> {
//!         &mut self.0
//!     }
//! }
//!
//! impl<'p> Age<'p> {
//!     fn at_least(&mut self, min: u32) -> Result<&mut Self, AssertionFailure> {
//!         self.is(move |age: &u32| *age >= min, Message::new("age.at_least").arg(min))
//!     }
//! }
//!
//! let mut age = Age(ValidationChain::new("age", Some(30)));
//! assert!(age.at_least(18).and_then(|a| a.at_least(21)).is_ok());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::args::ArgSource;
use crate::error::{AssertionFailure, UsageError};
use crate::message::{KeyRenderer, Message, MessageRenderer};
use crate::predicate::{Not, Predicate};
use crate::resolve::{prepare, resolve};
use crate::tracker::{Category, Outcome, ResultTracker};
use crate::value::{Introspect, Value};

/// Parent type of a root chain. It has no values, so a root chain can never
/// have a parent to return to.
#[derive(Debug)]
pub enum Root {}

/// A chain that child chains can be merged back into.
pub trait ParentChain {
    /// Merge a finished child's tracker into this chain's tracker.
    fn absorb(&mut self, tracker: ResultTracker);
}

impl ParentChain for Root {
    fn absorb(&mut self, _tracker: ResultTracker) {
        match *self {}
    }
}

/// Evaluates one predicate under the chain's current mode.
///
/// This is the single primitive [`Checker::is`] and [`Checker::is_not`] are
/// built on.
pub trait Evaluate<T> {
    /// Run `predicate` against the value (unless stopped) and record or
    /// report the outcome under `message`.
    fn evaluate(
        &mut self,
        predicate: &dyn Fn(&T) -> bool,
        message: Message,
    ) -> Result<(), AssertionFailure>;
}

/// Fluent assertions that return the implementing type.
///
/// Implement [`chain`](Checker::chain) to point at the wrapped
/// [`ValidationChain`]; `is` and `is_not` then return `&mut Self`.
pub trait Checker: Sized {
    /// The type of the value under test.
    type Subject;

    /// The evaluator assertions run through.
    fn chain(&mut self) -> &mut dyn Evaluate<Self::Subject>;

    /// Assert that `predicate` holds for the value.
    ///
    /// Skipped when the chain is stopped. In fail-fast mode a false predicate
    /// returns `Err`; in accumulate mode it is recorded and `Ok` is returned.
    fn is<P>(
        &mut self,
        predicate: P,
        message: impl Into<Message>,
    ) -> Result<&mut Self, AssertionFailure>
    where
        P: Predicate<Self::Subject>,
    {
        self.chain().evaluate(
            &|value: &Self::Subject| predicate.check(value),
            message.into(),
        )?;
        Ok(self)
    }

    /// Assert that `predicate` does not hold for the value.
    fn is_not<P>(
        &mut self,
        predicate: P,
        message: impl Into<Message>,
    ) -> Result<&mut Self, AssertionFailure>
    where
        P: Predicate<Self::Subject>,
    {
        self.is(Not(predicate), message)
    }
}

/// The fluent validation object wrapping one value and its assertion state.
///
/// `'p` and `P` describe the parent a child chain returns to on
/// [`end`](ValidationChain::end); root chains use [`Root`].
pub struct ValidationChain<'p, T, P = Root> {
    value: Option<T>,
    name: String,
    stopped: bool,
    accumulate: bool,
    tracker: ResultTracker,
    renderer: Rc<dyn MessageRenderer>,
    parent: Option<&'p mut P>,
}

impl<T> ValidationChain<'static, T, Root> {
    /// Create a root chain named `name`. A `None` value starts stopped.
    pub fn new(name: impl Into<String>, value: Option<T>) -> Self {
        ValidationChain {
            stopped: value.is_none(),
            value,
            name: name.into(),
            accumulate: false,
            tracker: ResultTracker::new(),
            renderer: Rc::new(KeyRenderer),
            parent: None,
        }
    }

    /// Create a root chain over a present value.
    pub fn of(name: impl Into<String>, value: T) -> Self {
        Self::new(name, Some(value))
    }
}

impl<'p, T, P> ValidationChain<'p, T, P> {
    /// Switch to accumulate mode.
    pub fn accumulating(mut self) -> Self {
        self.accumulate = true;
        self
    }

    /// Switch to fail-fast mode.
    pub fn fail_fast(mut self) -> Self {
        self.accumulate = false;
        self
    }

    /// Render messages with `renderer` instead of [`KeyRenderer`]. Child
    /// chains inherit it.
    pub fn with_renderer(mut self, renderer: Rc<dyn MessageRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Toggle accumulate mode for subsequent assertions.
    pub fn set_accumulate(&mut self, accumulate: bool) -> &mut Self {
        self.accumulate = accumulate;
        self
    }

    /// Skip every subsequent assertion on this chain, whether or not the
    /// value is present.
    pub fn stop(&mut self) -> &mut Self {
        if !self.stopped {
            #[cfg(feature = "tracing")]
            tracing::debug!(chain = %self.name, "chain stopped");
            self.stopped = true;
        }
        self
    }

    /// The chain's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value under test, if present.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether assertions are being skipped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether failures are recorded rather than returned.
    pub fn is_accumulating(&self) -> bool {
        self.accumulate
    }

    /// The outcomes recorded so far, including merged children.
    pub fn tracker(&self) -> &ResultTracker {
        &self.tracker
    }

    /// Shorthand for `self.tracker().has_failures()`.
    pub fn has_failures(&self) -> bool {
        self.tracker.has_failures()
    }

    /// Consume the chain and return its tracker.
    pub fn into_tracker(self) -> ResultTracker {
        self.tracker
    }

    fn outcome(&self, message: &Message) -> Outcome {
        let rendered = self.renderer.render(message.key(), message.args());
        Outcome::new(message.key(), rendered.text)
    }

    fn record(&mut self, category: Category, message: &Message) {
        let outcome = self.outcome(message);
        self.tracker.record(category, &self.name, outcome);
    }

    fn spawn(&mut self, name: String, value: Option<Value>) -> ValidationChain<'_, Value, Self> {
        ValidationChain {
            stopped: self.stopped || value.is_none(),
            value,
            name,
            accumulate: self.accumulate,
            tracker: ResultTracker::new(),
            renderer: Rc::clone(&self.renderer),
            parent: Some(self),
        }
    }
}

impl<'p, T: Introspect, P> ValidationChain<'p, T, P> {
    /// Resolve `path` against the value and return a child chain over the
    /// result, named `"<name>.<path>"`. The path part of the name is the
    /// parsed path written back out, so `"a . b"` and `"a.b"` name the same
    /// child.
    ///
    /// Returns `Ok(None)` when the path is malformed, its arguments do not
    /// match the declared arity, or resolution fails for any reason. A path
    /// that resolves to null yields a stopped child. A stopped chain does
    /// not resolve at all and yields a stopped child, so assertions made on
    /// it still show up as skipped.
    ///
    /// # Errors
    ///
    /// [`UsageError::UnsupportedArgSource`] when a call segment cannot bind
    /// arguments of the supplied convention.
    pub fn check_property(
        &mut self,
        path: &str,
        args: impl Into<ArgSource>,
    ) -> Result<Option<ValidationChain<'_, Value, Self>>, UsageError> {
        let args = args.into();
        let segments = match prepare(path, &args)? {
            Ok(segments) => segments,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(chain = %self.name, path, error = %_err, "path rejected");
                return Ok(None);
            }
        };

        let resolved = match (&self.value, self.stopped) {
            (Some(value), false) => match resolve(value, &segments, &args) {
                Ok(Value::Null) => None,
                Ok(value) => Some(value),
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(chain = %self.name, path, error = %_err, "path did not resolve");
                    return Ok(None);
                }
            },
            _ => None,
        };

        let path = segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        let name = format!("{}.{}", self.name, path);
        Ok(Some(self.spawn(name, resolved)))
    }
}

impl<'p, T, P: ParentChain> ValidationChain<'p, T, P> {
    /// Merge this chain's outcomes into its parent and return the parent.
    ///
    /// # Errors
    ///
    /// [`UsageError::NoParent`] on a root chain, or on a child that has
    /// already been ended.
    pub fn end(&mut self) -> Result<&'p mut P, UsageError> {
        let parent = self.parent.take().ok_or_else(|| UsageError::NoParent {
            chain: self.name.clone(),
        })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(chain = %self.name, "merging child chain into parent");
        parent.absorb(std::mem::take(&mut self.tracker));
        Ok(parent)
    }
}

impl<'p, T, P> AsRef<ResultTracker> for ValidationChain<'p, T, P> {
    fn as_ref(&self) -> &ResultTracker {
        &self.tracker
    }
}

impl<'p, T, P> ParentChain for ValidationChain<'p, T, P> {
    fn absorb(&mut self, tracker: ResultTracker) {
        self.tracker.merge(tracker);
    }
}

impl<'p, T, P> Evaluate<T> for ValidationChain<'p, T, P> {
    fn evaluate(
        &mut self,
        predicate: &dyn Fn(&T) -> bool,
        message: Message,
    ) -> Result<(), AssertionFailure> {
        let value = match (&self.value, self.stopped) {
            (Some(value), false) => value,
            _ => {
                self.record(Category::Skipped, &message);
                return Ok(());
            }
        };

        if predicate(value) {
            if self.accumulate {
                self.record(Category::Passed, &message);
            }
            return Ok(());
        }

        if self.accumulate {
            self.record(Category::Failed, &message);
            return Ok(());
        }

        let outcome = self.outcome(&message);
        #[cfg(feature = "tracing")]
        tracing::debug!(chain = %self.name, assertion = outcome.assertion(), "assertion failed");
        Err(AssertionFailure {
            entity: self.name.clone(),
            assertion: outcome.assertion().to_string(),
            message: outcome.message().to_string(),
        })
    }
}

impl<'p, T, P> Checker for ValidationChain<'p, T, P> {
    type Subject = T;

    fn chain(&mut self) -> &mut dyn Evaluate<T> {
        self
    }
}

impl<'p, T: fmt::Debug, P> fmt::Debug for ValidationChain<'p, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationChain")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("stopped", &self.stopped)
            .field("accumulate", &self.accumulate)
            .field("tracker", &self.tracker)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
