// crates/catch-condition/tests/ambient.rs
// ============================================================================
// Module: Ambient Catcher Tests
// Description: Free-function capture against the thread's catcher.
// Purpose: Ensure the thread-scoped catcher behaves like an owned one, stays
//          isolated per thread, and tolerates nested use.
// Dependencies: catch_condition, support::conditions
// ============================================================================
//! ## Overview
//! Integration tests for [`catch_condition::ambient`]. Each test resets the
//! thread's catcher first, since the harness may reuse threads.

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

use std::thread;

use catch_condition::CaptureError;
use catch_condition::CatcherConfig;
use catch_condition::ConditionOrigin;
use catch_condition::ConditionScope;
use catch_condition::ConfigError;
use catch_condition::ExpectedKind;
use catch_condition::Kind;
use catch_condition::ambient;
use support::TestResult;
use support::conditions::IllegalArgumentError;
use support::conditions::IndexRangeError;
use support::conditions::RetryError;
use support::conditions::RuntimeFault;
use support::conditions::checked_get;
use support::conditions::sentinel;
use support::ensure;
use support::ensure_eq;

/// Absent operation with a concrete type.
type NoOperation = fn() -> Result<(), IndexRangeError>;

// ============================================================================
// SECTION: Capture / Verify
// ============================================================================

#[test]
fn ambient_capture_stores_condition() -> TestResult {
    ambient::reset();
    let list: Vec<String> = Vec::new();

    ambient::capture_kind(|| checked_get(&list, 0), Kind::of::<IndexRangeError>())?;
    ensure(ambient::last_captured_is::<IndexRangeError>(), "Expected IndexRangeError")?;
    let first = ambient::last_captured().ok_or("Expected a condition")?;
    let second = ambient::last_captured().ok_or("Expected a condition")?;
    ensure(first.same_as(&second), "Expected repeated reads to agree")?;

    ambient::clear();
    ensure(ambient::last_captured().is_none(), "Expected clear to empty the slot")?;
    Ok(())
}

#[test]
fn ambient_capture_rethrows_non_matching_error() -> TestResult {
    ambient::reset();
    ambient::set(sentinel());

    let result = ambient::capture_kind(
        || Err::<(), _>(IllegalArgumentError("nope".to_string())),
        Kind::of::<IndexRangeError>(),
    );
    let rethrown = result.err().and_then(CaptureError::into_rethrown);
    ensure(
        rethrown == Some(IllegalArgumentError("nope".to_string())),
        "Expected the original error back",
    )?;
    ensure(ambient::last_captured().is_none(), "Expected holder cleared")?;
    Ok(())
}

#[test]
fn ambient_rejection_keeps_seeded_condition() -> TestResult {
    ambient::reset();
    let seeded = sentinel();
    ambient::set(seeded.clone());

    let error = ambient::capture_with(None::<NoOperation>, ExpectedKind::Any)
        .err()
        .ok_or("Expected rejection")?;
    ensure_eq(error.to_string(), "obj must not be null", "Expected operation message")?;
    ensure(
        ambient::last_captured().is_some_and(|held| held.same_as(&seeded)),
        "Expected the seeded condition to remain",
    )?;
    ensure(ambient::last_captured_is::<RetryError>(), "Expected the sentinel kind")?;
    Ok(())
}

#[test]
fn ambient_verify_reports_not_raised() -> TestResult {
    ambient::reset();

    let error = ambient::verify(|| Ok::<_, IndexRangeError>(())).err().ok_or("Expected failure")?;
    ensure_eq(error.to_string(), "Exception expected but not thrown", "Expected wording")?;

    let list: Vec<u8> = Vec::new();
    ambient::verify_kind(|| checked_get(&list, 4), Kind::of::<IndexRangeError>())?;
    ensure(ambient::last_captured_is::<IndexRangeError>(), "Expected the verified capture")?;

    let error = ambient::verify_with(None::<NoOperation>, ExpectedKind::Any)
        .err()
        .ok_or("Expected rejection")?;
    ensure(error.invalid_argument().is_some(), "Expected InvalidArgument")?;
    Ok(())
}

// ============================================================================
// SECTION: Isolation and Nesting
// ============================================================================

#[test]
fn threads_have_independent_catchers() -> TestResult {
    ambient::reset();
    ambient::set(sentinel());

    let worker = thread::spawn(|| {
        let empty_on_start = ambient::last_captured().is_none();
        let captured = ambient::capture(|| Err::<(), _>(IllegalArgumentError("worker".to_string())))
            .is_ok()
            && ambient::last_captured_is::<IllegalArgumentError>();
        (empty_on_start, captured)
    });
    let (empty_on_start, captured) = worker.join().map_err(|_| "Worker thread panicked")?;
    ensure(empty_on_start, "Expected a fresh catcher on the worker thread")?;
    ensure(captured, "Expected the worker to capture on its own catcher")?;
    ensure(ambient::last_captured_is::<RetryError>(), "Expected this thread unaffected")?;
    Ok(())
}

#[test]
fn operation_may_use_ambient_catcher() -> TestResult {
    ambient::reset();
    let list: Vec<u8> = Vec::new();

    ambient::capture(|| {
        ambient::capture(|| checked_get(&list, 0)).map_err(|_| {
            IllegalArgumentError("inner capture rethrew".to_string())
        })?;
        let inner_held = ambient::last_captured_is::<IndexRangeError>();
        Err::<(), _>(IllegalArgumentError(format!("outer after inner={inner_held}")))
    })?;
    let held = ambient::last_captured().ok_or("Expected the outer failure")?;
    ensure_eq(held.message(), "illegal argument: outer after inner=true", "Expected outer message")?;
    Ok(())
}

// ============================================================================
// SECTION: Settings
// ============================================================================

#[test]
fn configure_switches_scope_until_reset() -> TestResult {
    ambient::reset();
    ambient::configure(CatcherConfig::with_scope(ConditionScope::ErrorsAndPanics))?;
    ensure_eq(ambient::scope(), ConditionScope::ErrorsAndPanics, "Expected panic scope")?;

    ambient::capture(|| -> Result<(), IndexRangeError> { std::panic::panic_any("ambient") })?;
    ensure(
        ambient::last_captured().is_some_and(|held| held.origin() == ConditionOrigin::Panicked),
        "Expected the panic captured",
    )?;

    ambient::reset();
    ensure_eq(ambient::scope(), ConditionScope::Errors, "Expected default scope after reset")?;
    ensure(ambient::last_captured().is_none(), "Expected empty holder after reset")?;
    Ok(())
}

#[test]
fn invalid_configuration_keeps_current_catcher() -> TestResult {
    ambient::reset();
    ambient::set(sentinel());

    let result = ambient::configure(CatcherConfig {
        scope: ConditionScope::ErrorsAndPanics,
        max_cause_depth: 0,
    });
    ensure(
        matches!(result, Err(ConfigError::Invalid(_))),
        "Expected the configuration to be rejected",
    )?;
    ensure_eq(ambient::scope(), ConditionScope::Errors, "Expected scope unchanged")?;
    ensure(ambient::last_captured().is_some(), "Expected holder unchanged")?;
    Ok(())
}

#[test]
fn ambient_hierarchy_declarations_apply() -> TestResult {
    ambient::reset();
    ambient::declare_subkind::<IndexRangeError, RuntimeFault>()?;
    let list: Vec<u8> = Vec::new();

    ambient::capture_kind(|| checked_get(&list, 0), Kind::of::<RuntimeFault>())?;
    ensure(ambient::last_captured_is::<IndexRangeError>(), "Expected the subkind absorbed")?;
    ambient::reset();
    Ok(())
}
