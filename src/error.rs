//! Errors a caller of a chain can observe
//!
//! Path and resolution faults never show up here: they are absorbed into
//! "no result" by [`check_property`](crate::ValidationChain::check_property).
//! What remains is:
//!
//! - [`AssertionFailure`]: a predicate evaluated to false in fail-fast mode;
//! - [`UsageError`]: the chain was driven incorrectly, reported in every mode;
//! - [`CheckError`]: either of the above, so one `?` covers both.

use std::fmt;

use crate::args::Convention;

/// A predicate evaluated to false while the chain was in fail-fast mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    /// Name of the chain the assertion ran on (`"root.user"`).
    pub entity: String,
    /// The assertion's message key.
    pub assertion: String,
    /// The rendered message.
    pub message: String,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.message)
    }
}

impl std::error::Error for AssertionFailure {}

/// The chain API was used incorrectly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// `end()` was called on a chain that has no parent (a root chain, or a
    /// child that was already ended).
    NoParent {
        /// Name of the chain `end()` was called on.
        chain: String,
    },
    /// A call segment cannot be bound with the supplied argument convention.
    UnsupportedArgSource {
        /// The call segment, as written in the path.
        segment: String,
        /// The convention that was supplied.
        convention: Convention,
    },
}

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageError::NoParent { chain } => {
                write!(f, "`end()` called on `{}`, which has no parent chain", chain)
            }
            UsageError::UnsupportedArgSource {
                segment,
                convention,
            } => write!(
                f,
                "call segment `{}` cannot bind {} arguments",
                segment, convention
            ),
        }
    }
}

impl std::error::Error for UsageError {}

/// Any error a chain operation can return.
///
/// # Examples
///
/// ```
/// use fathom::{CheckError, Checker, ValidationChain};
///
/// fn check(age: u32) -> Result<(), CheckError> {
///     let mut chain = ValidationChain::new("age", Some(age));
///     chain.is(|a: &u32| *a >= 18, "age.adult")?;
///     Ok(())
/// }
///
/// assert!(check(21).is_ok());
/// assert!(matches!(check(12), Err(CheckError::Assertion(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// See [`AssertionFailure`].
    Assertion(AssertionFailure),
    /// See [`UsageError`].
    Usage(UsageError),
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::Assertion(err) => write!(f, "assertion failed: {}", err),
            CheckError::Usage(err) => write!(f, "usage error: {}", err),
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CheckError::Assertion(err) => Some(err),
            CheckError::Usage(err) => Some(err),
        }
    }
}

impl From<AssertionFailure> for CheckError {
    fn from(err: AssertionFailure) -> Self {
        CheckError::Assertion(err)
    }
}

impl From<UsageError> for CheckError {
    fn from(err: UsageError) -> Self {
        CheckError::Usage(err)
    }
}
