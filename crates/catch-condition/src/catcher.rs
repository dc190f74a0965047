// crates/catch-condition/src/catcher.rs
// ============================================================================
// Module: Catcher
// Description: Per-test context object owning the holder, invoker and trace.
// Purpose: Public entry point for capture, verify and last-capture reads.
// Dependencies: crate::{condition, config, error, holder, invoke, kind, trace, verify}
// ============================================================================

//! ## Overview
//! Construct one [`Catcher`] per test and discard it afterwards. Independent
//! catchers never share state, so tests running on separate threads stay
//! independent without locking.
//!
//! ```
//! use catch_condition::Catcher;
//! use catch_condition::ConditionScope;
//! use catch_condition::Kind;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("empty")]
//! struct Empty;
//!
//! let mut catcher = Catcher::for_scope(ConditionScope::Errors);
//! let result = catcher.capture_kind(|| Err::<(), _>(Empty), Kind::of::<Empty>());
//! assert!(result.is_ok());
//! assert_eq!(catcher.last_captured().map(|c| c.message()), Some("empty"));
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;

use crate::condition::CapturedCondition;
use crate::condition::Raise;
use crate::config::CatcherConfig;
use crate::config::ConfigError;
use crate::error::CaptureError;
use crate::error::ConditionNotRaised;
use crate::error::InvalidArgument;
use crate::error::VerifyError;
use crate::holder::ConditionHolder;
use crate::invoke::ExpectedKind;
use crate::invoke::Invoker;
use crate::invoke::Outcome;
use crate::invoke::Raised;
use crate::kind::HierarchyError;
use crate::kind::Kind;
use crate::kind::KindHierarchy;
use crate::scope::ConditionScope;
use crate::trace::CaptureOperation;
use crate::trace::CaptureTrace;
use crate::trace::NoopTrace;
use crate::verify::Verifier;

// ============================================================================
// SECTION: Catcher
// ============================================================================

/// Capture-and-verify context for one test.
///
/// # Invariants
/// - The holder is only written by capture and verify calls, or explicitly
///   through [`Catcher::holder_mut`] and [`Catcher::clear`].
#[derive(Debug, Clone, Default)]
pub struct Catcher<T: CaptureTrace = NoopTrace> {
    /// Last captured condition.
    holder: ConditionHolder,
    /// Capture engine.
    invoker: Invoker,
    /// Transition observer.
    trace: T,
}

impl Catcher<NoopTrace> {
    /// Creates a catcher from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn new(config: CatcherConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            holder: ConditionHolder::new(),
            invoker: Invoker::new(config, KindHierarchy::new())?,
            trace: NoopTrace,
        })
    }

    /// Creates a catcher with default settings for `scope`.
    #[must_use]
    pub fn for_scope(scope: ConditionScope) -> Self {
        Self {
            holder: ConditionHolder::new(),
            invoker: Invoker::from_validated(
                CatcherConfig::with_scope(scope),
                KindHierarchy::new(),
            ),
            trace: NoopTrace,
        }
    }
}

impl<T: CaptureTrace> Catcher<T> {
    /// Replaces the trace hook.
    #[must_use]
    pub fn with_trace<U: CaptureTrace>(self, trace: U) -> Catcher<U> {
        Catcher {
            holder: self.holder,
            invoker: self.invoker,
            trace,
        }
    }

    /// Replaces the kind hierarchy.
    #[must_use]
    pub fn with_hierarchy(mut self, hierarchy: KindHierarchy) -> Self {
        *self.invoker.hierarchy_mut() = hierarchy;
        self
    }

    // ------------------------------------------------------------------------
    // Capture
    // ------------------------------------------------------------------------

    /// Captures any failure of `operation`.
    ///
    /// # Errors
    ///
    /// Without a filter every failure is absorbed, so this only mirrors the
    /// signature of [`Catcher::capture_with`].
    pub fn capture<F, R, E>(&mut self, operation: F) -> Result<(), CaptureError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
    {
        self.capture_with(Some(operation), ExpectedKind::Any)
    }

    /// Captures a failure of `operation` whose kind matches `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Rethrown`] with the original error when its kind
    /// does not match. A non-matching panic is resumed instead.
    pub fn capture_kind<F, R, E>(&mut self, operation: F, kind: Kind) -> Result<(), CaptureError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
    {
        self.capture_with(Some(operation), ExpectedKind::from(kind))
    }

    /// Captures with explicit argument slots.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidArgument`] for an absent operation or an
    /// explicitly absent kind, leaving the holder untouched, and
    /// [`CaptureError::Rethrown`] for a non-matching error.
    pub fn capture_with<F, R, E>(
        &mut self,
        operation: Option<F>,
        expected: ExpectedKind,
    ) -> Result<(), CaptureError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
    {
        self.invoker.capture(&mut self.holder, &mut self.trace, operation, expected)
    }

    // ------------------------------------------------------------------------
    // Verify
    // ------------------------------------------------------------------------

    /// Requires that `operation` fails.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::NotRaised`] when the operation completed.
    pub fn verify<F, R, E>(&mut self, operation: F) -> Result<(), VerifyError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
    {
        self.verify_with(Some(operation), ExpectedKind::Any)
    }

    /// Requires that `operation` fails with a kind matching `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::NotRaised`] when the operation completed and
    /// [`VerifyError::Rethrown`] for a non-matching error.
    pub fn verify_kind<F, R, E>(&mut self, operation: F, kind: Kind) -> Result<(), VerifyError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
    {
        self.verify_with(Some(operation), ExpectedKind::from(kind))
    }

    /// Verifies with explicit argument slots.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidArgument`], [`VerifyError::Rethrown`] or
    /// [`VerifyError::NotRaised`]; see [`Verifier::verify`].
    pub fn verify_with<F, R, E>(
        &mut self,
        operation: Option<F>,
        expected: ExpectedKind,
    ) -> Result<(), VerifyError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
    {
        Verifier::new(&self.invoker).verify(&mut self.holder, &mut self.trace, operation, expected)
    }

    // ------------------------------------------------------------------------
    // Split Steps
    // ------------------------------------------------------------------------

    /// Validates arguments and clears the holder.
    pub(crate) fn begin<F>(
        &mut self,
        operation_kind: CaptureOperation,
        operation: Option<F>,
        expected: ExpectedKind,
    ) -> Result<(F, Option<Kind>), InvalidArgument> {
        self.invoker.prepare(operation_kind, &mut self.holder, &mut self.trace, operation, expected)
    }

    /// Classifies a raised failure and stores it when absorbed.
    pub(crate) fn settle<E: Raise>(
        &mut self,
        operation_kind: CaptureOperation,
        raised: Raised<E>,
        filter: Option<Kind>,
    ) -> Outcome<E> {
        self.invoker.settle(operation_kind, &mut self.holder, &mut self.trace, raised, filter)
    }

    /// Runs the verify post-check.
    pub(crate) fn check_raised(&mut self, filter: Option<Kind>) -> Result<(), ConditionNotRaised> {
        Verifier::new(&self.invoker).check(&self.holder, &mut self.trace, filter)
    }

    // ------------------------------------------------------------------------
    // Holder Access
    // ------------------------------------------------------------------------

    /// Returns the last captured condition.
    #[must_use]
    pub const fn last_captured(&self) -> Option<&CapturedCondition> {
        self.holder.get()
    }

    /// Returns the last captured failure as an `E`, if it is one.
    #[must_use]
    pub fn last_captured_as<E: StdError + 'static>(&self) -> Option<&E> {
        self.holder.get().and_then(|condition| condition.downcast_ref::<E>())
    }

    /// Discards the last captured condition.
    pub fn clear(&mut self) {
        self.holder.clear();
    }

    /// Returns the holder.
    #[must_use]
    pub const fn holder(&self) -> &ConditionHolder {
        &self.holder
    }

    /// Returns the holder for direct seeding or clearing.
    pub const fn holder_mut(&mut self) -> &mut ConditionHolder {
        &mut self.holder
    }

    // ------------------------------------------------------------------------
    // Configuration Access
    // ------------------------------------------------------------------------

    /// Returns the intercepted failure channels.
    #[must_use]
    pub const fn scope(&self) -> ConditionScope {
        self.invoker.scope()
    }

    /// Returns the kind hierarchy.
    #[must_use]
    pub const fn hierarchy(&self) -> &KindHierarchy {
        self.invoker.hierarchy()
    }

    /// Returns the kind hierarchy for new declarations.
    pub const fn hierarchy_mut(&mut self) -> &mut KindHierarchy {
        self.invoker.hierarchy_mut()
    }

    /// Declares `C` as a subkind of `P`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Cycle`] when the relation would be cyclic.
    pub fn declare_subkind<C, P>(&mut self) -> Result<(), HierarchyError>
    where
        C: ?Sized + 'static,
        P: ?Sized + 'static,
    {
        self.invoker.hierarchy_mut().declare_subkind::<C, P>()
    }

    /// Returns the trace hook.
    #[must_use]
    pub const fn trace(&self) -> &T {
        &self.trace
    }

    /// Returns the trace hook mutably.
    pub const fn trace_mut(&mut self) -> &mut T {
        &mut self.trace
    }

    /// Consumes the catcher, returning the trace hook.
    pub fn into_trace(self) -> T {
        self.trace
    }
}
