//! Argument sources for call segments
//!
//! A path such as `area(0).scale(2).label(lang)` may invoke behaviors that
//! need arguments. The caller supplies them once, for the whole path, as an
//! [`ArgSource`]. Three binding conventions are supported:
//!
//! | Convention | Supplied as | Per call segment |
//! |------------|-------------|------------------|
//! | positional | `Vec<Value>` | consumes `N` values off the front of a shared queue |
//! | typed | `Vec<TypedArg>` | consumes `N` `(value, declared type)` pairs; the declared type selects the overload |
//! | named | `BTreeMap<String, Value>` | looks its declared parameter names up in a shared map; nothing is consumed |
//!
//! Numeric call segments (`scale(2)`) bind positionally or typed; named call
//! segments (`label(lang)`) bind from a named map. A zero-argument call
//! (`area()` or `area(0)`) binds with any source.
//!
//! # Examples
//!
//! ```
//! use fathom::{ArgSource, TypedArg, Value, ValueType};
//!
//! let positional = ArgSource::positional([Value::from(2), Value::from("en")]);
//! assert_eq!(positional.len(), 2);
//!
//! let typed = ArgSource::typed([TypedArg::new(2, ValueType::Float)]);
//! assert_eq!(typed.len(), 1);
//!
//! let named = ArgSource::named([("lang", "en")]);
//! assert_eq!(named.len(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::UsageError;
use crate::path::{CallParams, PathSegment, SegmentKind};
use crate::value::{Value, ValueType};

/// One argument of the typed convention: a value and the type it should be
/// treated as during overload selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedArg {
    /// The argument value.
    pub value: Value,
    /// The declared parameter type.
    pub declared: ValueType,
}

impl TypedArg {
    /// Pair a value with its declared type.
    pub fn new(value: impl Into<Value>, declared: ValueType) -> Self {
        TypedArg {
            value: value.into(),
            declared,
        }
    }
}

/// The binding convention an [`ArgSource`] or [`CallArgs`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Flat ordered queue of values.
    Positional,
    /// Ordered queue of `(value, declared type)` pairs.
    Typed,
    /// Name to value map.
    Named,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Convention::Positional => "positional",
            Convention::Typed => "typed",
            Convention::Named => "named",
        };
        f.write_str(name)
    }
}

/// Arguments supplied for every call segment of one path.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgSource {
    /// Positional queue shared by all call segments, consumed left to right.
    Positional(Vec<Value>),
    /// Typed queue shared by all call segments, consumed left to right.
    Typed(Vec<TypedArg>),
    /// Named map shared by all call segments, never consumed.
    Named(BTreeMap<String, Value>),
}

impl ArgSource {
    /// No arguments at all.
    ///
    /// An empty source is compatible with every call segment: a call that
    /// needs arguments simply finds none, and the path does not resolve.
    pub fn none() -> Self {
        ArgSource::Positional(Vec::new())
    }

    /// Positional arguments.
    pub fn positional<V, I>(values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        ArgSource::Positional(values.into_iter().map(Into::into).collect())
    }

    /// Typed arguments.
    pub fn typed<I>(args: I) -> Self
    where
        I: IntoIterator<Item = TypedArg>,
    {
        ArgSource::Typed(args.into_iter().collect())
    }

    /// Named arguments.
    pub fn named<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        ArgSource::Named(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The binding convention of this source.
    pub fn convention(&self) -> Convention {
        match self {
            ArgSource::Positional(_) => Convention::Positional,
            ArgSource::Typed(_) => Convention::Typed,
            ArgSource::Named(_) => Convention::Named,
        }
    }

    /// Number of supplied arguments.
    pub fn len(&self) -> usize {
        match self {
            ArgSource::Positional(values) => values.len(),
            ArgSource::Typed(args) => args.len(),
            ArgSource::Named(entries) => entries.len(),
        }
    }

    /// True when no arguments were supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ArgSource {
    fn default() -> Self {
        ArgSource::none()
    }
}

impl From<Vec<Value>> for ArgSource {
    fn from(values: Vec<Value>) -> Self {
        ArgSource::Positional(values)
    }
}

impl From<Vec<TypedArg>> for ArgSource {
    fn from(args: Vec<TypedArg>) -> Self {
        ArgSource::Typed(args)
    }
}

impl From<BTreeMap<String, Value>> for ArgSource {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        ArgSource::Named(entries)
    }
}

/// One argument bound to a call.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArg {
    /// The argument value.
    pub value: Value,
    /// Declared type, under the typed convention.
    pub declared: Option<ValueType>,
    /// Parameter name, under the named convention.
    pub name: Option<String>,
}

impl BoundArg {
    /// The type used for overload selection: the declared type when there is
    /// one, the runtime type otherwise.
    pub fn effective_type(&self) -> ValueType {
        self.declared.unwrap_or_else(|| self.value.value_type())
    }
}

/// The arguments bound to a single behavior invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgs {
    convention: Convention,
    args: Vec<BoundArg>,
}

impl CallArgs {
    /// A zero-argument call.
    pub fn empty() -> Self {
        CallArgs::positional(Vec::new())
    }

    /// Positional arguments.
    pub fn positional(values: Vec<Value>) -> Self {
        CallArgs {
            convention: Convention::Positional,
            args: values
                .into_iter()
                .map(|value| BoundArg {
                    value,
                    declared: None,
                    name: None,
                })
                .collect(),
        }
    }

    /// Typed arguments.
    pub fn typed(args: Vec<TypedArg>) -> Self {
        CallArgs {
            convention: Convention::Typed,
            args: args
                .into_iter()
                .map(|arg| BoundArg {
                    value: arg.value,
                    declared: Some(arg.declared),
                    name: None,
                })
                .collect(),
        }
    }

    /// Named arguments, in the order the call segment declared them.
    pub fn named(args: Vec<(String, Value)>) -> Self {
        CallArgs {
            convention: Convention::Named,
            args: args
                .into_iter()
                .map(|(name, value)| BoundArg {
                    value,
                    declared: None,
                    name: Some(name),
                })
                .collect(),
        }
    }

    /// The convention these arguments were bound with.
    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Number of bound arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// True for a zero-argument call.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// The `index`-th argument value.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.args.get(index).map(|arg| &arg.value)
    }

    /// All bound arguments, in order.
    pub fn iter(&self) -> impl Iterator<Item = &BoundArg> {
        self.args.iter()
    }

    /// Argument values, in order.
    pub fn values(&self) -> Vec<Value> {
        self.args.iter().map(|arg| arg.value.clone()).collect()
    }
}

/// Why a path's call segments cannot be bound to an [`ArgSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BindingError {
    /// The source's convention cannot serve a call segment. Programming error.
    Usage(UsageError),
    /// Declared and supplied positional/typed arity differ.
    ArityMismatch { declared: usize, supplied: usize },
    /// A named call segment declares a name the map lacks.
    MissingName(String),
}

/// Check every call segment of `segments` against `source` before resolving.
///
/// Positional and typed sources must supply exactly as many arguments as the
/// numeric call segments declare in total. A named map must contain every
/// name the named call segments declare. An empty source of any convention
/// never raises a usage error.
pub(crate) fn check_bindings(
    segments: &[PathSegment],
    source: &ArgSource,
) -> Result<(), BindingError> {
    let mut declared = 0usize;
    for segment in segments {
        let params = match &segment.kind {
            SegmentKind::Call(params) => params,
            SegmentKind::Member => continue,
        };
        match (params, source) {
            (CallParams::Arity(0), _) => {}
            (CallParams::Named(names), _) if names.is_empty() => {}
            (CallParams::Arity(n), ArgSource::Positional(_) | ArgSource::Typed(_)) => {
                declared = declared
                    .checked_add(*n)
                    .ok_or(BindingError::ArityMismatch {
                        declared: usize::MAX,
                        supplied: source.len(),
                    })?;
            }
            (CallParams::Arity(n), ArgSource::Named(_)) if source.is_empty() => {
                return Err(BindingError::ArityMismatch {
                    declared: *n,
                    supplied: 0,
                });
            }
            (CallParams::Named(names), ArgSource::Positional(_) | ArgSource::Typed(_))
                if source.is_empty() =>
            {
                return Err(BindingError::MissingName(names.join(",")));
            }
            (CallParams::Named(names), ArgSource::Named(map)) => {
                if let Some(missing) = names.iter().find(|name| !map.contains_key(*name)) {
                    return Err(BindingError::MissingName(missing.clone()));
                }
            }
            (CallParams::Arity(_), ArgSource::Named(_))
            | (CallParams::Named(_), ArgSource::Positional(_) | ArgSource::Typed(_)) => {
                return Err(BindingError::Usage(UsageError::UnsupportedArgSource {
                    segment: segment.to_string(),
                    convention: source.convention(),
                }));
            }
        }
    }
    let supplied = match source {
        ArgSource::Named(_) => return Ok(()),
        other => other.len(),
    };
    if declared == supplied {
        Ok(())
    } else {
        Err(BindingError::ArityMismatch { declared, supplied })
    }
}

/// Walks an [`ArgSource`] segment by segment, handing each call its arguments.
#[derive(Debug)]
pub(crate) struct ArgCursor<'a> {
    source: &'a ArgSource,
    consumed: usize,
}

impl<'a> ArgCursor<'a> {
    pub(crate) fn new(source: &'a ArgSource) -> Self {
        ArgCursor {
            source,
            consumed: 0,
        }
    }

    /// Bind the arguments for one call, advancing the shared queue when the
    /// convention consumes.
    pub(crate) fn bind(&mut self, params: &CallParams) -> Option<CallArgs> {
        match (params, self.source) {
            (CallParams::Named(names), ArgSource::Named(map)) => {
                let mut bound = Vec::with_capacity(names.len());
                for name in names {
                    bound.push((name.clone(), map.get(name)?.clone()));
                }
                Some(CallArgs::named(bound))
            }
            (CallParams::Named(names), _) if names.is_empty() => Some(CallArgs::empty()),
            (CallParams::Arity(0), _) => Some(CallArgs::empty()),
            (CallParams::Arity(n), ArgSource::Positional(values)) => {
                let end = self.consumed.checked_add(*n)?;
                let taken = values.get(self.consumed..end)?.to_vec();
                self.consumed = end;
                Some(CallArgs::positional(taken))
            }
            (CallParams::Arity(n), ArgSource::Typed(args)) => {
                let end = self.consumed.checked_add(*n)?;
                let taken = args.get(self.consumed..end)?.to_vec();
                self.consumed = end;
                Some(CallArgs::typed(taken))
            }
            _ => None,
        }
    }
}
