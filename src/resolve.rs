//! Walking parsed paths against introspectable values
//!
//! [`resolve`] takes a root value, the segments of a parsed path and the
//! caller's [`ArgSource`], and walks the segments one at a time:
//!
//! 1. a member segment reads the member of that name; if there is none it
//!    falls back to a zero-argument behavior of the same name;
//! 2. a call segment binds its arguments from the shared source and invokes
//!    the behavior selected by name and arity;
//! 3. the remaining segments are resolved against the value just produced.
//!
//! A `Null` reached on the final segment is a definite result. A `Null` with
//! segments still to walk, a missing member or behavior, and a failed
//! invocation all end resolution with a [`ResolveError`], which the chain
//! turns into "no result".

use std::fmt;

use crate::args::{check_bindings, ArgCursor, ArgSource, BindingError, CallArgs};
use crate::error::UsageError;
use crate::path::{parse_path, CallParams, PathError, PathSegment, SegmentKind};
use crate::value::{Introspect, InvokeError, Value};

/// Why a path produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The path does not parse.
    Syntax(PathError),
    /// Declared and supplied argument counts differ.
    ArityMismatch {
        /// Total arity declared by the path's numeric call segments.
        declared: usize,
        /// Number of supplied positional or typed arguments.
        supplied: usize,
    },
    /// A named call segment declares a parameter the argument map lacks.
    MissingArgument(String),
    /// Neither a member nor a zero-argument behavior has this name.
    MemberNotFound {
        /// The type the lookup ran against.
        type_name: String,
        /// The member name.
        member: String,
    },
    /// The behavior could not be selected or raised an error.
    Invocation {
        /// The segment being invoked.
        segment: String,
        /// What went wrong.
        source: InvokeError,
    },
    /// A `Null` was reached with segments still to walk.
    NullTraversal {
        /// The first segment that could not be walked.
        segment: String,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Syntax(err) => write!(f, "invalid path: {}", err),
            ResolveError::ArityMismatch { declared, supplied } => write!(
                f,
                "path declares {} argument(s) but {} were supplied",
                declared, supplied
            ),
            ResolveError::MissingArgument(name) => {
                write!(f, "no argument named `{}` was supplied", name)
            }
            ResolveError::MemberNotFound { type_name, member } => {
                write!(f, "`{}` has no member `{}`", type_name, member)
            }
            ResolveError::Invocation { segment, source } => {
                write!(f, "cannot invoke `{}`: {}", segment, source)
            }
            ResolveError::NullTraversal { segment } => {
                write!(f, "cannot resolve `{}` on null", segment)
            }
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Syntax(err) => Some(err),
            ResolveError::Invocation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<PathError> for ResolveError {
    fn from(err: PathError) -> Self {
        ResolveError::Syntax(err)
    }
}

/// Resolve `segments` against `root`, binding call arguments from `args`.
///
/// Returns `Ok(Value::Null)` when the final segment yields null.
///
/// # Examples
///
/// ```
/// use fathom::resolve::resolve;
/// use fathom::path::parse_path;
/// use fathom::{ArgSource, Value};
///
/// let order = Value::map([("items", Value::from(vec!["pen", "ink"]))]);
/// let segments = parse_path("items.get(1)").unwrap();
///
/// let item = resolve(&order, &segments, &ArgSource::positional([1])).unwrap();
/// assert_eq!(item, Value::from("ink"));
/// ```
pub fn resolve(
    root: &dyn Introspect,
    segments: &[PathSegment],
    args: &ArgSource,
) -> Result<Value, ResolveError> {
    let mut cursor = ArgCursor::new(args);
    walk(root, segments, &mut cursor)
}

fn walk(
    current: &dyn Introspect,
    segments: &[PathSegment],
    cursor: &mut ArgCursor<'_>,
) -> Result<Value, ResolveError> {
    let Some((segment, rest)) = segments.split_first() else {
        return Err(ResolveError::Syntax(PathError::Empty));
    };

    let value = resolve_segment(current, segment, cursor)?;
    #[cfg(feature = "tracing")]
    tracing::trace!(segment = %segment, value_type = %value.value_type(), "resolved segment");

    match (rest.first(), value) {
        (None, value) => Ok(value),
        (Some(next), Value::Null) => Err(ResolveError::NullTraversal {
            segment: next.to_string(),
        }),
        (Some(_), value) => walk(&value, rest, cursor),
    }
}

fn resolve_segment(
    current: &dyn Introspect,
    segment: &PathSegment,
    cursor: &mut ArgCursor<'_>,
) -> Result<Value, ResolveError> {
    match &segment.kind {
        SegmentKind::Member => {
            if let Some(value) = current.member(&segment.identifier) {
                return Ok(value);
            }
            current
                .invoke(&segment.identifier, &CallArgs::empty())
                .map_err(|_| ResolveError::MemberNotFound {
                    type_name: current.type_name().to_string(),
                    member: segment.identifier.clone(),
                })
        }
        SegmentKind::Call(params) => {
            let args = cursor.bind(params).ok_or_else(|| missing_args(params))?;
            current
                .invoke(&segment.identifier, &args)
                .map_err(|source| ResolveError::Invocation {
                    segment: segment.to_string(),
                    source,
                })
        }
    }
}

fn missing_args(params: &CallParams) -> ResolveError {
    match params {
        CallParams::Named(names) => ResolveError::MissingArgument(names.join(",")),
        CallParams::Arity(n) => ResolveError::ArityMismatch {
            declared: *n,
            supplied: 0,
        },
    }
}

/// Parse `path` and check its call segments against `args`.
///
/// The outer `Result` carries programming errors that must surface; the inner
/// one carries every reason the path can never produce a value.
pub(crate) fn prepare(
    path: &str,
    args: &ArgSource,
) -> Result<Result<Vec<PathSegment>, ResolveError>, UsageError> {
    let segments = match parse_path(path) {
        Ok(segments) => segments,
        Err(err) => return Ok(Err(err.into())),
    };
    match check_bindings(&segments, args) {
        Ok(()) => Ok(Ok(segments)),
        Err(BindingError::Usage(err)) => Err(err),
        Err(BindingError::ArityMismatch { declared, supplied }) => {
            Ok(Err(ResolveError::ArityMismatch { declared, supplied }))
        }
        Err(BindingError::MissingName(name)) => Ok(Err(ResolveError::MissingArgument(name))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_path;

    fn run(root: &Value, path: &str, args: ArgSource) -> Result<Value, ResolveError> {
        resolve(root, &parse_path(path).unwrap(), &args)
    }

    fn person() -> Value {
        Value::map([
            ("name", Value::from("Ann")),
            ("manager", Value::Null),
            (
                "address",
                Value::map([("city", Value::from("Oslo")), ("zip", Value::from("0150"))]),
            ),
            ("tags", Value::from(vec!["admin", "ops"])),
        ])
    }

    #[test]
    fn test_nested_members() {
        let city = run(&person(), "address.city", ArgSource::none()).unwrap();
        assert_eq!(city, Value::from("Oslo"));
    }

    #[test]
    fn test_member_falls_back_to_zero_arg_behavior() {
        let len = run(&person(), "tags.len", ArgSource::none()).unwrap();
        assert_eq!(len, Value::Int(2));
    }

    #[test]
    fn test_call_segment_is_never_a_member_read() {
        let err = run(&person(), "name(0)", ArgSource::none()).unwrap_err();
        assert!(matches!(err, ResolveError::Invocation { .. }));
    }

    #[test]
    fn test_final_null_is_a_definite_result() {
        assert_eq!(
            run(&person(), "manager", ArgSource::none()),
            Ok(Value::Null)
        );
    }

    #[test]
    fn test_null_with_segments_remaining_fails() {
        assert_eq!(
            run(&person(), "manager.name", ArgSource::none()),
            Err(ResolveError::NullTraversal {
                segment: "name".to_string()
            })
        );
    }

    #[test]
    fn test_missing_member() {
        let err = run(&person(), "address.street", ArgSource::none()).unwrap_err();
        assert_eq!(
            err,
            ResolveError::MemberNotFound {
                type_name: "map".to_string(),
                member: "street".to_string()
            }
        );
    }

    #[test]
    fn test_positional_queue_is_shared_across_segments() {
        let grid = Value::from(vec![Value::from(vec![1, 2]), Value::from(vec![3, 4])]);
        let cell = run(&grid, "get(1).get(1)", ArgSource::positional([1, 0])).unwrap();
        assert_eq!(cell, Value::Int(3));
    }

    #[test]
    fn test_invocation_failure_is_reported() {
        let err = run(&person(), "tags.get(1)", ArgSource::positional([9])).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Invocation {
                source: InvokeError::Failed(_),
                ..
            }
        ));
    }

    #[test]
    fn test_prepare_reports_arity_mismatch() {
        let outcome = prepare("tags.get(2)", &ArgSource::positional([0])).unwrap();
        assert_eq!(
            outcome,
            Err(ResolveError::ArityMismatch {
                declared: 2,
                supplied: 1
            })
        );
    }

    #[test]
    fn test_prepare_reports_syntax_errors() {
        let outcome = prepare("address..city", &ArgSource::none()).unwrap();
        assert!(matches!(outcome, Err(ResolveError::Syntax(_))));
    }

    #[test]
    fn test_prepare_surfaces_usage_errors() {
        let err = prepare("tags.get(1)", &ArgSource::named([("i", 0)])).unwrap_err();
        assert!(matches!(err, UsageError::UnsupportedArgSource { .. }));
    }
}
