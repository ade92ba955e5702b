//! Validates an order exposed through a dispatch table and prints a report
//!
//! Run with: cargo run --example order_report

use std::rc::Rc;

use fathom::dispatch::{DispatchTable, Reflected, Signature};
use fathom::prelude::*;

#[derive(Debug)]
struct Order {
    id: u32,
    lines: Vec<(String, u32, f64)>,
    coupon: Option<String>,
}

impl Order {
    fn subtotal(&self) -> f64 {
        self.lines.iter().map(|(_, qty, price)| f64::from(*qty) * price).sum()
    }
}

fn order_table() -> DispatchTable<Order> {
    DispatchTable::new("Order")
        .member("id", |o: &Order| Value::from(o.id))
        .member("coupon", |o: &Order| Value::from(o.coupon.clone()))
        .behavior("subtotal", Signature::new(), |o: &Order, _: &[Value]| {
            Ok(Value::from(o.subtotal()))
        })
        .behavior(
            "line",
            Signature::new().param("index", ValueType::Int),
            |o: &Order, args: &[Value]| {
                let index = args[0].as_int().ok_or("index must be an int")?;
                let (sku, qty, price) = usize::try_from(index)
                    .ok()
                    .and_then(|i| o.lines.get(i))
                    .ok_or_else(|| format!("no line {}", index))?;
                Ok(Value::map([
                    ("sku", Value::from(sku.as_str())),
                    ("qty", Value::from(*qty)),
                    ("price", Value::from(*price)),
                ]))
            },
        )
        .behavior(
            "discounted",
            Signature::new().param("percent", ValueType::Float),
            |o: &Order, args: &[Value]| {
                let percent = args[0].as_float().ok_or("percent must be numeric")?;
                Ok(Value::from(o.subtotal() * (1.0 - percent / 100.0)))
            },
        )
}

fn main() -> Result<(), CheckError> {
    let order = Order {
        id: 7,
        lines: vec![("pen".into(), 2, 1.5), ("ink".into(), 0, 4.0)],
        coupon: None,
    };
    let order = Value::object(Reflected::new(order, Rc::new(order_table())));

    let mut chain = ValidationChain::of("order", order).accumulating();

    if let Some(mut subtotal) = chain.check_property("subtotal()", ArgSource::none())? {
        subtotal.is(|v: &Value| v.as_float() > Some(0.0), "subtotal.positive")?;
        subtotal.end()?;
    }

    for index in 0..2 {
        let args = ArgSource::positional([index]);
        if let Some(mut qty) = chain.check_property("line(1).qty", args)? {
            qty.is(|v: &Value| v.as_int() > Some(0), Message::new("line.qty").arg(index))?;
            qty.end()?;
        }
    }

    let named = ArgSource::named([("percent", 10)]);
    if let Some(mut total) = chain.check_property("discounted(percent)", named)? {
        total.is(|v: &Value| v.as_float() < Some(3.0), "discount.applies")?;
        total.end()?;
    }

    if let Some(mut coupon) = chain.check_property("coupon", ArgSource::none())? {
        coupon.is(|v: &Value| v.as_str().is_some_and(|c| !c.is_empty()), "coupon.set")?;
        coupon.end()?;
    }

    let tracker = chain.into_tracker();
    for (entity, outcomes) in tracker.iter() {
        for category in Category::ALL {
            for outcome in outcomes.get(category) {
                println!("{:<8} {:<24} {}", category.to_string(), entity, outcome.message());
            }
        }
    }
    println!("not checked: {:?}", tracker.not_checked());
    Ok(())
}
