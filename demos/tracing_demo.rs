//! Shows the debug events a chain emits while probing paths
//!
//! Run with: cargo run --example tracing_demo --features tracing

use fathom::prelude::*;

fn main() -> Result<(), CheckError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    tracing::info!("Starting tracing demo");

    let profile = Value::map([
        ("handle", Value::from("ann")),
        ("followers", Value::from(vec![1, 2, 3])),
        ("manager", Value::Null),
    ]);

    let mut chain = ValidationChain::of("profile", profile).accumulating();

    if let Some(mut followers) = chain.check_property("followers.len()", ArgSource::none())? {
        followers.is(|n: &Value| n.as_int() >= Some(1), "followers.any")?;
        followers.end()?;
    }

    // Unknown member: logged and absorbed.
    let missing = chain.check_property("email", ArgSource::none())?;
    tracing::info!(resolved = missing.is_some(), "probed email");

    // Null member: the child is stopped and its assertion is skipped.
    if let Some(mut manager) = chain.check_property("manager", ArgSource::none())? {
        manager.is(|_: &Value| true, "manager.assigned")?;
        manager.end()?;
    }

    chain.stop();
    chain.is(|_: &Value| false, "profile.never_run")?;

    tracing::info!(
        failed = chain.tracker().count(Category::Failed),
        skipped = chain.tracker().count(Category::Skipped),
        "done"
    );
    Ok(())
}
