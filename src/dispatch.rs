//! Explicit member and behavior registries
//!
//! Rust has no runtime reflection, so user types expose members and behaviors
//! to path resolution through a [`DispatchTable`]: a name-keyed registry of
//! accessor closures and typed behavior overloads. Wrapping a value together
//! with its table in [`Reflected`] gives an [`Introspect`] implementation.
//!
//! # Overload selection
//!
//! Behaviors are selected by name and arity first. Among those, the
//! candidates whose parameters accept the bound arguments remain:
//!
//! - positional arguments are matched by their runtime [`ValueType`];
//! - typed arguments are matched by their declared type;
//! - named arguments are matched by parameter name, in any order.
//!
//! `Float` parameters accept `Int` arguments. When several candidates remain,
//! one that matches every argument type exactly wins; otherwise the call is
//! ambiguous.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//! use fathom::dispatch::{DispatchTable, Reflected, Signature};
//! use fathom::path::parse_path;
//! use fathom::resolve::resolve;
//! use fathom::{ArgSource, Value, ValueType};
//!
//! struct Rect {
//!     w: f64,
//!     h: f64,
//! }
//!
//! let table = DispatchTable::new("Rect")
//!     .member("w", |r: &Rect| Value::from(r.w))
//!     .behavior("area", Signature::new(), |r: &Rect, _args: &[Value]| {
//!         Ok(Value::from(r.w * r.h))
//!     })
//!     .behavior(
//!         "scaled",
//!         Signature::new().param("factor", ValueType::Float),
//!         |r: &Rect, args: &[Value]| {
//!             let k = args[0].as_float().ok_or("factor must be numeric")?;
//!             Ok(Value::from(r.w * r.h * k * k))
//!         },
//!     );
//!
//! let rect = Reflected::new(Rect { w: 2.0, h: 3.0 }, Rc::new(table));
//! let area = resolve(&rect, &parse_path("scaled(1)").unwrap(), &ArgSource::positional([2]));
//! assert_eq!(area, Ok(Value::from(24.0)));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::args::{CallArgs, Convention};
use crate::value::{Introspect, InvokeError, Value, ValueType};

type MemberFn<T> = Box<dyn Fn(&T) -> Value>;
type BehaviorFn<T> = Box<dyn Fn(&T, &[Value]) -> Result<Value, String>>;

/// One declared behavior parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter name, matched by named arguments.
    pub name: String,
    /// Parameter type, matched by positional and typed arguments.
    pub ty: ValueType,
}

/// The ordered parameter list of a behavior overload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// A zero-parameter signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn param(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
        });
        self
    }

    /// The declared parameters.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Order `args` to match this signature, or `None` if they do not fit.
    /// The flag is true when every argument type matches exactly.
    fn bind(&self, args: &CallArgs) -> Option<(Vec<Value>, bool)> {
        if self.arity() != args.len() {
            return None;
        }
        let ordered: Vec<_> = match args.convention() {
            Convention::Named => self
                .params
                .iter()
                .map(|p| {
                    args.iter()
                        .find(|a| a.name.as_deref() == Some(p.name.as_str()))
                })
                .collect::<Option<_>>()?,
            Convention::Positional | Convention::Typed => args.iter().collect(),
        };

        let mut exact = true;
        for (param, arg) in self.params.iter().zip(&ordered) {
            let actual = arg.effective_type();
            if !param.ty.accepts(actual) {
                return None;
            }
            exact &= param.ty == actual;
        }
        Some((ordered.into_iter().map(|a| a.value.clone()).collect(), exact))
    }
}

struct Behavior<T> {
    name: String,
    signature: Signature,
    call: BehaviorFn<T>,
}

/// Name-keyed accessors and behavior overloads for `T`.
pub struct DispatchTable<T> {
    type_name: String,
    members: BTreeMap<String, MemberFn<T>>,
    behaviors: Vec<Behavior<T>>,
}

impl<T> DispatchTable<T> {
    /// An empty table for the type called `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        DispatchTable {
            type_name: type_name.into(),
            members: BTreeMap::new(),
            behaviors: Vec::new(),
        }
    }

    /// Register a readable member.
    pub fn member<F>(mut self, name: impl Into<String>, read: F) -> Self
    where
        F: Fn(&T) -> Value + 'static,
    {
        self.members.insert(name.into(), Box::new(read));
        self
    }

    /// Register a behavior overload.
    ///
    /// `call` receives its arguments already ordered and type-checked against
    /// `signature`. Report failures by returning `Err`: the resolver turns
    /// them into "no result". A panicking behavior is not caught and unwinds
    /// through [`check_property`](crate::ValidationChain::check_property).
    ///
    /// ```
    /// use std::rc::Rc;
    /// use fathom::dispatch::{DispatchTable, Reflected, Signature};
    /// use fathom::{ArgSource, ValidationChain, Value, ValueType};
    ///
    /// let table = DispatchTable::new("Counter").behavior(
    ///     "nth",
    ///     Signature::new().param("index", ValueType::Int),
    ///     |_: &(), args: &[Value]| match args.first().and_then(Value::as_int) {
    ///         Some(n) if n >= 0 => Ok(Value::from(n)),
    ///         _ => Err("index must be non-negative".to_string()),
    ///     },
    /// );
    /// let counter = Value::object(Reflected::new((), Rc::new(table)));
    ///
    /// let mut chain = ValidationChain::of("counter", counter);
    /// let child = chain.check_property("nth(1)", ArgSource::positional([-1])).unwrap();
    /// assert!(child.is_none());
    /// ```
    pub fn behavior<F>(mut self, name: impl Into<String>, signature: Signature, call: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, String> + 'static,
    {
        self.behaviors.push(Behavior {
            name: name.into(),
            signature,
            call: Box::new(call),
        });
        self
    }

    /// The registered type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Read member `name` of `target`.
    pub fn read(&self, target: &T, name: &str) -> Option<Value> {
        self.members.get(name).map(|read| read(target))
    }

    /// Select the overload of `name` that accepts `args` and run it.
    pub fn call(&self, target: &T, name: &str, args: &CallArgs) -> Result<Value, InvokeError> {
        let mut candidates: Vec<_> = self
            .behaviors
            .iter()
            .filter(|b| b.name == name)
            .filter_map(|b| b.signature.bind(args).map(|(values, exact)| (b, values, exact)))
            .collect();

        if candidates.len() > 1 && candidates.iter().any(|(_, _, exact)| *exact) {
            candidates.retain(|(_, _, exact)| *exact);
        }
        match candidates.len() {
            0 => Err(InvokeError::NotFound {
                name: name.to_string(),
                arity: args.len(),
            }),
            1 => {
                let (behavior, values, _) = candidates.remove(0);
                (behavior.call)(target, &values).map_err(InvokeError::Failed)
            }
            _ => Err(InvokeError::Ambiguous {
                name: name.to_string(),
            }),
        }
    }
}

impl<T> fmt::Debug for DispatchTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("type_name", &self.type_name)
            .field("members", &self.members.keys().collect::<Vec<_>>())
            .field(
                "behaviors",
                &self
                    .behaviors
                    .iter()
                    .map(|b| (b.name.as_str(), b.signature.arity()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A value paired with the dispatch table that describes it.
///
/// Derefs to the wrapped value, so predicates can read it directly.
pub struct Reflected<T> {
    inner: T,
    table: Rc<DispatchTable<T>>,
}

impl<T> Reflected<T> {
    /// Pair `inner` with `table`.
    pub fn new(inner: T, table: Rc<DispatchTable<T>>) -> Self {
        Reflected { inner, table }
    }

    /// Unwrap the value.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Deref for Reflected<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> Introspect for Reflected<T> {
    fn type_name(&self) -> &str {
        self.table.type_name()
    }

    fn member(&self, name: &str) -> Option<Value> {
        self.table.read(&self.inner, name)
    }

    fn invoke(&self, name: &str, args: &CallArgs) -> Result<Value, InvokeError> {
        self.table.call(&self.inner, name, args)
    }
}

impl<T: fmt::Debug> fmt::Debug for Reflected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reflected").field(&self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::TypedArg;

    struct Greeter {
        name: String,
    }

    fn table() -> DispatchTable<Greeter> {
        DispatchTable::new("Greeter")
            .member("name", |g: &Greeter| Value::from(g.name.as_str()))
            .behavior(
                "greet",
                Signature::new().param("times", ValueType::Int),
                |g: &Greeter, args: &[Value]| {
                    let n = args[0].as_int().ok_or("times must be an int")?;
                    let n = usize::try_from(n).map_err(|e| e.to_string())?;
                    Ok(Value::from(format!("hi {}", g.name).repeat(n)))
                },
            )
            .behavior(
                "greet",
                Signature::new().param("title", ValueType::Str),
                |g: &Greeter, args: &[Value]| {
                    let title = args[0].as_str().unwrap_or_default();
                    Ok(Value::from(format!("hi {} {}", title, g.name)))
                },
            )
            .behavior(
                "span",
                Signature::new()
                    .param("from", ValueType::Float)
                    .param("to", ValueType::Float),
                |_: &Greeter, args: &[Value]| {
                    let from = args[0].as_float().unwrap_or_default();
                    let to = args[1].as_float().unwrap_or_default();
                    Ok(Value::from(to - from))
                },
            )
    }

    fn greeter() -> Greeter {
        Greeter {
            name: "Ann".to_string(),
        }
    }

    #[test]
    fn test_read_member() {
        assert_eq!(table().read(&greeter(), "name"), Some(Value::from("Ann")));
        assert_eq!(table().read(&greeter(), "age"), None);
    }

    #[test]
    fn test_positional_overload_by_runtime_type() {
        let t = table();
        let by_int = t.call(&greeter(), "greet", &CallArgs::positional(vec![Value::from(2)]));
        assert_eq!(by_int, Ok(Value::from("hi Annhi Ann")));

        let by_str = t.call(&greeter(), "greet", &CallArgs::positional(vec![Value::from("Dr")]));
        assert_eq!(by_str, Ok(Value::from("hi Dr Ann")));
    }

    #[test]
    fn test_typed_overload_uses_declared_type() {
        let args = CallArgs::typed(vec![TypedArg::new(1, ValueType::Str)]);
        let result = table().call(&greeter(), "greet", &args);
        // The declared type picks the `title` overload; the value is not a string.
        assert_eq!(result, Ok(Value::from("hi  Ann")));
    }

    #[test]
    fn test_named_arguments_match_in_any_order() {
        let args = CallArgs::named(vec![
            ("to".to_string(), Value::from(5.0)),
            ("from".to_string(), Value::from(2)),
        ]);
        assert_eq!(table().call(&greeter(), "span", &args), Ok(Value::from(3.0)));
    }

    #[test]
    fn test_unknown_name_or_arity() {
        let t = table();
        assert!(matches!(
            t.call(&greeter(), "greet", &CallArgs::empty()),
            Err(InvokeError::NotFound { arity: 0, .. })
        ));
        assert!(matches!(
            t.call(&greeter(), "wave", &CallArgs::empty()),
            Err(InvokeError::NotFound { .. })
        ));
    }

    #[test]
    fn test_behavior_error_is_failed() {
        let args = CallArgs::positional(vec![Value::from(-1)]);
        assert!(matches!(
            table().call(&greeter(), "greet", &args),
            Err(InvokeError::Failed(_))
        ));
    }

    #[test]
    fn test_ambiguous_overloads() {
        let t = DispatchTable::new("Twice")
            .behavior(
                "f",
                Signature::new().param("x", ValueType::Float),
                |_: &(), _: &[Value]| Ok(Value::Null),
            )
            .behavior(
                "f",
                Signature::new().param("y", ValueType::Float),
                |_: &(), _: &[Value]| Ok(Value::Null),
            );
        let args = CallArgs::positional(vec![Value::from(1)]);
        assert!(matches!(
            t.call(&(), "f", &args),
            Err(InvokeError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_reflected_derefs_and_introspects() {
        let reflected = Reflected::new(greeter(), Rc::new(table()));
        assert_eq!(reflected.name, "Ann");
        assert_eq!(reflected.type_name(), "Greeter");
        assert_eq!(reflected.member("name"), Some(Value::from("Ann")));
    }
}
