//! Dynamic values and the introspection capability
//!
//! Path probing needs to read members and invoke behaviors by name on values
//! whose types are only known at runtime. This module models that with two
//! pieces:
//!
//! - [`Value`], the dynamic value every resolved path segment produces;
//! - [`Introspect`], the capability a type implements to expose named members
//!   ("read named member") and named behaviors ("invoke named behavior with
//!   bound arguments").
//!
//! `Value` itself implements `Introspect`: map entries are members, and a
//! small set of built-in behaviors (`len`, `is_empty`, `get`, `contains`) is
//! available on strings, lists and maps. User types usually implement
//! `Introspect` through a [`DispatchTable`](crate::dispatch::DispatchTable).
//!
//! # Examples
//!
//! ```
//! use fathom::{Introspect, Value};
//!
//! let user = Value::map([("name", Value::from("Ann")), ("age", Value::from(36))]);
//! assert_eq!(user.member("name"), Some(Value::from("Ann")));
//! assert_eq!(user.member("email"), None);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::args::CallArgs;

/// The runtime shape of a [`Value`], used for overload selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// [`Value::Null`]
    Null,
    /// [`Value::Bool`]
    Bool,
    /// [`Value::Int`]
    Int,
    /// [`Value::Float`]
    Float,
    /// [`Value::Str`]
    Str,
    /// [`Value::List`]
    List,
    /// [`Value::Map`]
    Map,
    /// [`Value::Object`]
    Object,
}

impl ValueType {
    /// Whether a parameter declared as `self` accepts an argument of type `actual`.
    ///
    /// Types must match exactly, except that `Float` parameters accept `Int`
    /// arguments.
    pub fn accepts(self, actual: ValueType) -> bool {
        self == actual || (self == ValueType::Float && actual == ValueType::Int)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Why a behavior invocation produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// No behavior with this name accepts the supplied arguments.
    NotFound {
        /// Behavior name.
        name: String,
        /// Number of supplied arguments.
        arity: usize,
    },
    /// More than one overload accepts the supplied arguments.
    Ambiguous {
        /// Behavior name.
        name: String,
    },
    /// The behavior ran and reported an error.
    Failed(String),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::NotFound { name, arity } => {
                write!(f, "no behavior `{}` taking {} argument(s)", name, arity)
            }
            InvokeError::Ambiguous { name } => {
                write!(f, "call to `{}` matches more than one overload", name)
            }
            InvokeError::Failed(reason) => write!(f, "invocation failed: {}", reason),
        }
    }
}

impl std::error::Error for InvokeError {}

/// Capability to read named members and invoke named behaviors at runtime.
pub trait Introspect {
    /// Human-readable type name, used in diagnostics.
    fn type_name(&self) -> &str;

    /// Read the member called `name`; `None` when there is no such member.
    fn member(&self, name: &str) -> Option<Value>;

    /// Invoke the behavior called `name` with already-bound arguments.
    fn invoke(&self, name: &str, args: &CallArgs) -> Result<Value, InvokeError>;
}

/// A dynamically typed value produced by path resolution.
#[derive(Clone, Default)]
pub enum Value {
    /// Definite absence of a value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Ordered list.
    List(Vec<Value>),
    /// String-keyed map; its entries are readable as members.
    Map(BTreeMap<String, Value>),
    /// A user value exposing its own members and behaviors.
    Object(Rc<dyn Introspect>),
}

impl Value {
    /// Wrap a user type implementing [`Introspect`].
    pub fn object(inner: impl Introspect + 'static) -> Self {
        Value::Object(Rc::new(inner))
    }

    /// Build a map value from key/value pairs.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The runtime shape of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
            Value::Object(_) => ValueType::Object,
        }
    }

    /// True for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The number as `f64`, if this is a `Float` or an `Int`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// The string slice, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    fn builtin(&self, name: &str, args: &CallArgs) -> Result<Value, InvokeError> {
        let not_found = || InvokeError::NotFound {
            name: name.to_string(),
            arity: args.len(),
        };
        match (name, args.len()) {
            ("len", 0) => match self {
                Value::Str(s) => Ok(Value::from(s.chars().count())),
                Value::List(items) => Ok(Value::from(items.len())),
                Value::Map(entries) => Ok(Value::from(entries.len())),
                _ => Err(not_found()),
            },
            ("is_empty", 0) => match self {
                Value::Str(s) => Ok(Value::Bool(s.is_empty())),
                Value::List(items) => Ok(Value::Bool(items.is_empty())),
                Value::Map(entries) => Ok(Value::Bool(entries.is_empty())),
                _ => Err(not_found()),
            },
            ("get", 1) => match (self, args.value(0)) {
                (Value::List(items), Some(Value::Int(index))) => usize::try_from(*index)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        InvokeError::Failed(format!(
                            "index {} out of bounds for list of length {}",
                            index,
                            items.len()
                        ))
                    }),
                (Value::Map(entries), Some(Value::Str(key))) => {
                    entries.get(key).cloned().ok_or_else(|| {
                        InvokeError::Failed(format!("no entry for key `{}`", key))
                    })
                }
                _ => Err(not_found()),
            },
            ("contains", 1) => match (self, args.value(0)) {
                (Value::Str(s), Some(Value::Str(needle))) => {
                    Ok(Value::Bool(s.contains(needle.as_str())))
                }
                (Value::List(items), Some(needle)) => Ok(Value::Bool(items.contains(needle))),
                _ => Err(not_found()),
            },
            _ => Err(not_found()),
        }
    }
}

impl Introspect for Value {
    fn type_name(&self) -> &str {
        match self {
            Value::Object(inner) => inner.type_name(),
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    fn member(&self, name: &str) -> Option<Value> {
        match self {
            Value::Map(entries) => entries.get(name).cloned(),
            Value::Object(inner) => inner.member(name),
            _ => None,
        }
    }

    fn invoke(&self, name: &str, args: &CallArgs) -> Result<Value, InvokeError> {
        match self {
            Value::Object(inner) => inner.invoke(name, args),
            _ => self.builtin(name, args),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Object(inner) => write!(f, "Object(<{}>)", inner.type_name()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Objects have no structural equality; identity only.
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// Produce an independent copy of a value.
///
/// Predicates that check "does this operation leave its input unchanged"
/// copy the input before running the operation. The chain itself never calls
/// this; it is the seam such predicates rely on.
///
/// Every `Clone` type is `DeepCopy`. For [`Value::Object`] the copy shares the
/// underlying object, which is only ever reached through `&self`.
pub trait DeepCopy {
    /// Return an independent copy of `self`.
    fn deep_copy(&self) -> Self;
}

impl<T: Clone> DeepCopy for T {
    fn deep_copy(&self) -> Self {
        self.clone()
    }
}
