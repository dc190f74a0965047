// crates/catch-condition/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Assertion helpers and fixtures shared by catch-condition tests.
// ============================================================================
//! ## Overview
//! Assertions return [`TestResult`] instead of panicking, so a failing check
//! reads like any other propagated error and the capture calls under test can
//! use `?` alongside them.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Not every test binary uses every helper.")]

pub mod conditions;

use std::error::Error;
use std::fmt;

// ============================================================================
// SECTION: Results
// ============================================================================

/// Result type returned by every integration test.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Failed assertion.
#[derive(Debug)]
struct AssertionFailed {
    /// What was being checked, plus any rendered values.
    context: String,
}

impl fmt::Display for AssertionFailed {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "assertion failed: {}", self.context)
    }
}

impl Error for AssertionFailed {}

/// Boxes an assertion failure.
fn fail(context: impl Into<String>) -> TestResult {
    Err(Box::new(AssertionFailed {
        context: context.into(),
    }))
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Fails with `context` unless `condition` holds.
///
/// # Errors
/// Returns an assertion failure when `condition` is false.
pub fn ensure(condition: bool, context: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { fail(context) }
}

/// Fails unless `actual == expected`, rendering both sides.
///
/// # Errors
/// Returns an assertion failure naming both values when they differ.
pub fn ensure_eq<A, B>(actual: A, expected: B, context: &str) -> TestResult
where
    A: PartialEq<B> + fmt::Debug,
    B: fmt::Debug,
{
    if actual == expected {
        return Ok(());
    }
    fail(format!("{context}: expected {expected:?}, got {actual:?}"))
}
