//! Path probing against a dispatch table with every argument convention

use std::rc::Rc;

use fathom::dispatch::{DispatchTable, Reflected, Signature};
use fathom::prelude::*;
use fathom::{assert_failed, assert_passed, Convention, UsageError};

#[derive(Debug)]
struct Shelf {
    title: String,
    books: Vec<&'static str>,
}

#[derive(Debug)]
struct Book {
    title: &'static str,
}

fn book_table() -> DispatchTable<Book> {
    DispatchTable::new("Book")
        .behavior(
            "label",
            Signature::new().param("size", ValueType::Int),
            |b: &Book, args: &[Value]| Ok(Value::from(format!("{} {:?}", b.title, args[0]))),
        )
        .behavior(
            "label",
            Signature::new().param("size", ValueType::Float),
            |b: &Book, args: &[Value]| {
                let size = args[0].as_float().ok_or("size must be numeric")?;
                Ok(Value::from(format!("{} scaled {}", b.title, size)))
            },
        )
}

fn table() -> DispatchTable<Shelf> {
    DispatchTable::new("Shelf")
        .member("title", |s: &Shelf| Value::from(s.title.as_str()))
        .behavior(
            "volume",
            Signature::new().param("index", ValueType::Int),
            |s: &Shelf, args: &[Value]| {
                let index = args[0].as_int().ok_or("index must be an int")?;
                let title = usize::try_from(index)
                    .ok()
                    .and_then(|i| s.books.get(i).copied())
                    .ok_or_else(|| format!("no book at {}", index))?;
                Ok(Value::object(Reflected::new(
                    Book { title },
                    Rc::new(book_table()),
                )))
            },
        )
        .behavior("count", Signature::new(), |s: &Shelf, _: &[Value]| {
            Ok(Value::from(s.books.len()))
        })
        .behavior(
            "book",
            Signature::new().param("index", ValueType::Int),
            |s: &Shelf, args: &[Value]| {
                let index = args[0].as_int().ok_or("index must be an int")?;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| s.books.get(i))
                    .map(|b| Value::from(*b))
                    .ok_or_else(|| format!("no book at {}", index))
            },
        )
        .behavior(
            "slice",
            Signature::new()
                .param("from", ValueType::Int)
                .param("to", ValueType::Int),
            |s: &Shelf, args: &[Value]| {
                let from = args[0].as_int().ok_or("from must be an int")? as usize;
                let to = args[1].as_int().ok_or("to must be an int")? as usize;
                s.books
                    .get(from..to)
                    .map(|books| Value::from(books.to_vec()))
                    .ok_or_else(|| "range out of bounds".to_string())
            },
        )
        .behavior(
            "describe",
            Signature::new().param("width", ValueType::Int),
            |_: &Shelf, _: &[Value]| Ok(Value::from("by width")),
        )
        .behavior(
            "describe",
            Signature::new().param("width", ValueType::Float),
            |_: &Shelf, _: &[Value]| Ok(Value::from("by ratio")),
        )
}

fn shelf() -> Value {
    let shelf = Shelf {
        title: "Classics".to_string(),
        books: vec!["Emma", "Ulysses", "Beloved"],
    };
    Value::object(Reflected::new(shelf, Rc::new(table())))
}

fn probe(path: &str, args: ArgSource) -> Result<Option<Value>, UsageError> {
    let mut chain = ValidationChain::of("shelf", shelf());
    let child = chain.check_property(path, args)?;
    Ok(child.and_then(|c| c.value().cloned()))
}

#[test]
fn test_member_round_trip() {
    assert_eq!(
        probe("title", ArgSource::none()),
        Ok(Some(Value::from("Classics")))
    );
}

#[test]
fn test_zero_arg_call_spellings() {
    for path in ["count", "count()", "count(0)"] {
        assert_eq!(probe(path, ArgSource::none()), Ok(Some(Value::from(3))), "{path}");
    }
    // Zero-argument calls bind under any convention.
    assert_eq!(
        probe("count()", ArgSource::named([("unused", 1)])),
        Ok(Some(Value::from(3)))
    );
}

#[test]
fn test_positional_queue_feeds_calls_in_order() {
    let args = ArgSource::positional([0, 2, 1]);
    assert_eq!(
        probe("slice(2).get(1)", args),
        Ok(Some(Value::from("Ulysses")))
    );
}

#[test]
fn test_positional_arity_mismatch_is_absent() {
    assert_eq!(probe("slice(2)", ArgSource::positional([0])), Ok(None));
    assert_eq!(probe("book(1)", ArgSource::positional([0, 1])), Ok(None));
}

#[test]
fn test_positional_overload_uses_runtime_type() {
    assert_eq!(
        probe("describe(1)", ArgSource::positional([3])),
        Ok(Some(Value::from("by width")))
    );
    assert_eq!(
        probe("describe(1)", ArgSource::positional([0.5])),
        Ok(Some(Value::from("by ratio")))
    );
}

#[test]
fn test_typed_overload_uses_declared_type() {
    let args = ArgSource::typed([TypedArg::new(3, ValueType::Float)]);
    assert_eq!(
        probe("describe(1)", args),
        Ok(Some(Value::from("by ratio")))
    );
}

#[test]
fn test_typed_queue_feeds_calls_in_order() {
    let args = ArgSource::typed([
        TypedArg::new(1, ValueType::Int),
        TypedArg::new(2, ValueType::Float),
    ]);
    assert_eq!(
        probe("volume(1).label(1)", args),
        Ok(Some(Value::from("Ulysses scaled 2")))
    );

    let args = ArgSource::typed([
        TypedArg::new(2, ValueType::Int),
        TypedArg::new(1, ValueType::Int),
    ]);
    assert_eq!(
        probe("volume(1).label(1)", args),
        Ok(Some(Value::from("Beloved Int(1)")))
    );
}

#[test]
fn test_typed_queue_too_short_for_path_is_absent() {
    let args = ArgSource::typed([TypedArg::new(1, ValueType::Int)]);
    assert_eq!(probe("volume(1).label(1)", args), Ok(None));
}

#[test]
fn test_named_map_binds_by_name() {
    let args = ArgSource::named([("to", 3), ("from", 1)]);
    assert_eq!(
        probe("slice(from,to).len()", args),
        Ok(Some(Value::from(2)))
    );
}

#[test]
fn test_named_map_is_shared_not_consumed() {
    let args = ArgSource::named([("index", 1)]);
    let mut chain = ValidationChain::of("shelf", shelf()).accumulating();
    for _ in 0..2 {
        chain
            .check_property("book(index)", args.clone())
            .unwrap()
            .unwrap()
            .is(|b: &Value| b.as_str() == Some("Ulysses"), "book.second")
            .unwrap()
            .end()
            .unwrap();
    }
    assert_passed!(chain, "shelf.book(index)", 2);
}

#[test]
fn test_named_map_missing_name_is_absent() {
    let args = ArgSource::named([("from", 0)]);
    assert_eq!(probe("slice(from,to)", args), Ok(None));
}

#[test]
fn test_named_call_with_positional_source_is_usage_error() {
    let err = probe("book(index)", ArgSource::positional([1])).unwrap_err();
    assert_eq!(
        err,
        UsageError::UnsupportedArgSource {
            segment: "book(index)".to_string(),
            convention: Convention::Positional,
        }
    );
}

#[test]
fn test_numeric_call_with_named_source_is_usage_error() {
    let err = probe("book(1)", ArgSource::named([("index", 1)])).unwrap_err();
    assert!(matches!(
        err,
        UsageError::UnsupportedArgSource {
            convention: Convention::Named,
            ..
        }
    ));
}

#[test]
fn test_empty_source_is_absent_not_usage_error() {
    assert_eq!(probe("book(index)", ArgSource::none()), Ok(None));
    assert_eq!(
        probe("book(1)", ArgSource::named(Vec::<(String, Value)>::new())),
        Ok(None)
    );
}

#[test]
fn test_usage_error_surfaces_even_when_stopped() {
    let mut chain = ValidationChain::<Value>::new("shelf", None);
    assert!(chain
        .check_property("book(index)", ArgSource::positional([1]))
        .is_err());
}

#[test]
fn test_failed_invocation_is_absent() {
    assert_eq!(probe("book(1)", ArgSource::positional([9])), Ok(None));
}

#[test]
fn test_unknown_member_is_absent() {
    assert_eq!(probe("author", ArgSource::none()), Ok(None));
}

#[test]
fn test_probe_results_feed_assertions() {
    let mut chain = ValidationChain::of("shelf", shelf()).accumulating();
    let mut count = chain
        .check_property("count()", ArgSource::none())
        .unwrap()
        .unwrap();
    count
        .is(|n: &Value| n.as_int() == Some(3), "count.three")
        .unwrap()
        .is(|n: &Value| n.as_int() > Some(5), "count.large")
        .unwrap();
    count.end().unwrap();

    assert_passed!(chain, "shelf.count()", 1);
    assert_failed!(chain, "shelf.count()", 1);
}
