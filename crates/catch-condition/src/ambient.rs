// crates/catch-condition/src/ambient.rs
// ============================================================================
// Module: Ambient Catcher
// Description: Thread-scoped catcher behind free functions.
// Purpose: Offer static-call style capture without a process-wide global.
// Dependencies: crate::{catcher, condition, config, error, invoke, kind, trace}
// ============================================================================

//! ## Overview
//! Each thread owns one [`Catcher`]. The test harness runs every test on its
//! own thread, so the ambient catcher is effectively per test. No borrow of
//! the thread-local is held while an operation runs, so an operation may use
//! the ambient functions itself.
//!
//! Settings persist on the thread until [`configure`] or [`reset`] replaces
//! them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cell::RefCell;
use std::error::Error as StdError;

use crate::catcher::Catcher;
use crate::condition::CapturedCondition;
use crate::condition::Raise;
use crate::config::CatcherConfig;
use crate::config::ConfigError;
use crate::error::CaptureError;
use crate::error::VerifyError;
use crate::invoke::ExpectedKind;
use crate::invoke::run;
use crate::kind::HierarchyError;
use crate::kind::Kind;
use crate::scope::ConditionScope;
use crate::trace::CaptureOperation;

thread_local! {
    /// Catcher owned by the current thread.
    static AMBIENT: RefCell<Catcher> = RefCell::new(Catcher::default());
}

// ============================================================================
// SECTION: Capture / Verify
// ============================================================================

/// Captures any failure of `operation` into the thread's catcher.
///
/// # Errors
///
/// See [`capture_with`].
pub fn capture<F, R, E>(operation: F) -> Result<(), CaptureError<E>>
where
    F: FnOnce() -> Result<R, E>,
    E: Raise,
{
    capture_with(Some(operation), ExpectedKind::Any)
}

/// Captures a failure of `operation` whose kind matches `kind`.
///
/// # Errors
///
/// See [`capture_with`].
pub fn capture_kind<F, R, E>(operation: F, kind: Kind) -> Result<(), CaptureError<E>>
where
    F: FnOnce() -> Result<R, E>,
    E: Raise,
{
    capture_with(Some(operation), ExpectedKind::from(kind))
}

/// Captures with explicit argument slots.
///
/// # Errors
///
/// Returns [`CaptureError::InvalidArgument`] for rejected arguments and
/// [`CaptureError::Rethrown`] with the original error for a non-matching kind.
/// A non-matching panic is resumed instead.
pub fn capture_with<F, R, E>(
    operation: Option<F>,
    expected: ExpectedKind,
) -> Result<(), CaptureError<E>>
where
    F: FnOnce() -> Result<R, E>,
    E: Raise,
{
    let (operation, filter) = with_catcher(|catcher| {
        catcher.begin(CaptureOperation::Capture, operation, expected)
    })?;
    let raised = run(scope(), operation);
    let outcome =
        with_catcher(|catcher| catcher.settle(CaptureOperation::Capture, raised, filter));
    outcome.propagate().map_err(CaptureError::Rethrown)
}

/// Requires that `operation` fails.
///
/// # Errors
///
/// See [`verify_with`].
pub fn verify<F, R, E>(operation: F) -> Result<(), VerifyError<E>>
where
    F: FnOnce() -> Result<R, E>,
    E: Raise,
{
    verify_with(Some(operation), ExpectedKind::Any)
}

/// Requires that `operation` fails with a kind matching `kind`.
///
/// # Errors
///
/// See [`verify_with`].
pub fn verify_kind<F, R, E>(operation: F, kind: Kind) -> Result<(), VerifyError<E>>
where
    F: FnOnce() -> Result<R, E>,
    E: Raise,
{
    verify_with(Some(operation), ExpectedKind::from(kind))
}

/// Verifies with explicit argument slots.
///
/// # Errors
///
/// Returns [`VerifyError::InvalidArgument`] for rejected arguments,
/// [`VerifyError::Rethrown`] for a non-matching kind and
/// [`VerifyError::NotRaised`] when the operation completed.
pub fn verify_with<F, R, E>(operation: Option<F>, expected: ExpectedKind) -> Result<(), VerifyError<E>>
where
    F: FnOnce() -> Result<R, E>,
    E: Raise,
{
    let (operation, filter) =
        with_catcher(|catcher| catcher.begin(CaptureOperation::Verify, operation, expected))?;
    let raised = run(scope(), operation);
    let outcome = with_catcher(|catcher| catcher.settle(CaptureOperation::Verify, raised, filter));
    outcome.propagate().map_err(VerifyError::Rethrown)?;
    with_catcher(|catcher| catcher.check_raised(filter))?;
    Ok(())
}

// ============================================================================
// SECTION: Holder Access
// ============================================================================

/// Returns the thread's last captured condition.
#[must_use]
pub fn last_captured() -> Option<CapturedCondition> {
    with_catcher(|catcher| catcher.last_captured().cloned())
}

/// Returns true when the thread's last captured failure is an `E`.
#[must_use]
pub fn last_captured_is<E: StdError + 'static>() -> bool {
    with_catcher(|catcher| catcher.last_captured_as::<E>().is_some())
}

/// Discards the thread's last captured condition.
pub fn clear() {
    with_catcher(Catcher::clear);
}

/// Stores `condition` as the thread's last captured condition.
pub fn set(condition: CapturedCondition) {
    with_catcher(|catcher| catcher.holder_mut().set(condition));
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Replaces the thread's catcher with one built from `config`.
///
/// The holder and the kind hierarchy start empty.
///
/// # Errors
///
/// Returns [`ConfigError`] when the configuration is invalid; the current
/// catcher is kept.
pub fn configure(config: CatcherConfig) -> Result<(), ConfigError> {
    let catcher = Catcher::new(config)?;
    with_catcher(|current| *current = catcher);
    Ok(())
}

/// Restores the thread's catcher to defaults.
pub fn reset() {
    with_catcher(|current| *current = Catcher::default());
}

/// Returns the thread's scope.
#[must_use]
pub fn scope() -> ConditionScope {
    with_catcher(|catcher| catcher.scope())
}

/// Declares `C` as a subkind of `P` on the thread's catcher.
///
/// # Errors
///
/// Returns [`HierarchyError::Cycle`] when the relation would be cyclic.
pub fn declare_subkind<C, P>() -> Result<(), HierarchyError>
where
    C: ?Sized + 'static,
    P: ?Sized + 'static,
{
    with_catcher(Catcher::declare_subkind::<C, P>)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs `f` with the thread's catcher borrowed mutably.
fn with_catcher<U>(f: impl FnOnce(&mut Catcher) -> U) -> U {
    AMBIENT.with(|cell| f(&mut cell.borrow_mut()))
}
