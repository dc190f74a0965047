// crates/catch-condition/tests/holder.rs
// ============================================================================
// Module: Holder Tests
// Description: Single-slot semantics of the condition holder.
// Purpose: Ensure set, clear, take and try_set keep at most one condition.
// Dependencies: catch_condition, support::conditions
// ============================================================================
//! ## Overview
//! Integration tests for [`ConditionHolder`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod support;

use catch_condition::CapturedCondition;
use catch_condition::ConditionHolder;
use catch_condition::InvalidArgument;
use support::TestResult;
use support::conditions::IllegalArgumentError;
use support::conditions::sentinel;
use support::ensure;
use support::ensure_eq;

#[test]
fn new_holder_is_empty() -> TestResult {
    let holder = ConditionHolder::new();
    ensure(holder.is_empty(), "Expected empty holder")?;
    ensure(holder.get().is_none(), "Expected no condition")?;
    ensure(ConditionHolder::default().is_empty(), "Expected empty default holder")?;
    Ok(())
}

#[test]
fn set_replaces_previous_condition() -> TestResult {
    let mut holder = ConditionHolder::new();
    let first = sentinel();
    let second = CapturedCondition::new(IllegalArgumentError("second".to_string()));

    holder.set(first.clone());
    holder.set(second.clone());
    let held = holder.get().ok_or("Expected a condition")?;
    ensure(held.same_as(&second), "Expected the latest condition")?;
    ensure(!held.same_as(&first), "Expected the first condition to be gone")?;
    Ok(())
}

#[test]
fn clear_is_idempotent() -> TestResult {
    let mut holder = ConditionHolder::new();
    holder.set(sentinel());
    holder.clear();
    ensure(holder.is_empty(), "Expected empty after clear")?;
    holder.clear();
    ensure(holder.is_empty(), "Expected empty after second clear")?;
    Ok(())
}

#[test]
fn reads_do_not_mutate() -> TestResult {
    let mut holder = ConditionHolder::new();
    let seeded = sentinel();
    holder.set(seeded.clone());

    for _ in 0 .. 3 {
        let held = holder.get().ok_or("Expected a condition")?;
        ensure(held.same_as(&seeded), "Expected the seeded condition on every read")?;
    }
    Ok(())
}

#[test]
fn take_moves_condition_out() -> TestResult {
    let mut holder = ConditionHolder::new();
    let seeded = sentinel();
    holder.set(seeded.clone());

    let taken = holder.take().ok_or("Expected a condition")?;
    ensure(taken.same_as(&seeded), "Expected the seeded condition")?;
    ensure(holder.is_empty(), "Expected empty after take")?;
    ensure(holder.take().is_none(), "Expected nothing left to take")?;
    Ok(())
}

#[test]
fn try_set_rejects_absent_condition() -> TestResult {
    let mut holder = ConditionHolder::new();
    let seeded = sentinel();
    holder.set(seeded.clone());

    let error = holder.try_set(None).err().ok_or("Expected rejection")?;
    ensure_eq(&error, &InvalidArgument::missing_condition(), "Expected missing-condition error")?;
    ensure_eq(error.message(), "condition must not be null", "Expected message")?;
    let held = holder.get().ok_or("Expected the seeded condition to remain")?;
    ensure(held.same_as(&seeded), "Expected the slot unchanged")?;

    let replacement = CapturedCondition::new(IllegalArgumentError("next".to_string()));
    holder.try_set(Some(replacement.clone()))?;
    ensure(
        holder.get().is_some_and(|held| held.same_as(&replacement)),
        "Expected try_set to store a present condition",
    )?;
    Ok(())
}
