//! # Fathom
//!
//! Fluent validation chains that can reach into the value they check.
//!
//! Wrap a value in a [`ValidationChain`], chain assertions against it, and
//! either fail on the first false predicate or accumulate every outcome into a
//! [`ResultTracker`]. When an assertion concerns something nested inside the
//! value, probe it with a dotted path and check the result in a child chain:
//!
//! - `address.city` reads members;
//! - `tags.len()` or `tags.len(0)` invokes a zero-argument behavior;
//! - `cells.get(1)` takes one argument from a positional or typed queue;
//! - `label(lang)` takes the argument named `lang` from a named map.
//!
//! ## Quick Example
//!
//! ```rust
//! use fathom::{ArgSource, Checker, ValidationChain, Value};
//!
//! # fn main() -> Result<(), fathom::CheckError> {
//! let order = Value::map([
//!     ("id", Value::from(42)),
//!     ("items", Value::from(vec!["pen", "ink"])),
//!     ("customer", Value::map([("name", "Ann")])),
//! ]);
//!
//! let mut chain = ValidationChain::new("order", Some(order)).accumulating();
//! chain.is(|o: &Value| o.as_map().is_some(), "order.is_record")?;
//!
//! if let Some(mut items) = chain.check_property("items.len", ArgSource::none())? {
//!     items.is(|n: &Value| n.as_int() > Some(0), "items.not_empty")?;
//!     items.end()?;
//! }
//!
//! // No such member: the probe is absorbed rather than reported.
//! assert!(chain.check_property("customer.email", ArgSource::none())?.is_none());
//!
//! assert!(!chain.has_failures());
//! assert_eq!(chain.tracker().outcomes("order.items.len").unwrap().passed().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modes
//!
//! A chain starts in fail-fast mode: the first false predicate returns an
//! [`AssertionFailure`]. [`accumulating`](ValidationChain::accumulating)
//! records failures and passes instead. A chain without a value, or one that
//! was [`stop`](ValidationChain::stop)ped, skips every assertion and records
//! it as skipped.
//!
//! ## Features
//!
//! - `tracing`: debug-level events for absorbed path failures, stops and merges.
//! - `serde`: `Serialize`/`Deserialize` for trackers and outcomes.
//! - `proptest`: `Arbitrary` for trackers and outcomes.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod args;
pub mod chain;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod path;
pub mod predicate;
pub mod resolve;
pub mod semigroup;
pub mod testing;
pub mod tracker;
pub mod value;

// Re-exports
pub use args::{ArgSource, BoundArg, CallArgs, Convention, TypedArg};
pub use chain::{Checker, Evaluate, ParentChain, Root, ValidationChain};
pub use error::{AssertionFailure, CheckError, UsageError};
pub use message::{KeyRenderer, Message, MessageRenderer, RenderedMessage};
pub use predicate::{Not, Predicate};
pub use resolve::ResolveError;
pub use semigroup::Semigroup;
pub use tracker::{Category, Outcome, Outcomes, ResultTracker};
pub use value::{DeepCopy, Introspect, InvokeError, Value, ValueType};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::args::{ArgSource, TypedArg};
    pub use crate::chain::{Checker, ValidationChain};
    pub use crate::error::CheckError;
    pub use crate::message::Message;
    pub use crate::tracker::{Category, ResultTracker};
    pub use crate::value::{Introspect, Value, ValueType};
}
