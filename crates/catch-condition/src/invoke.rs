// crates/catch-condition/src/invoke.rs
// ============================================================================
// Module: Invoker
// Description: Runs a caller-supplied operation and classifies its outcome.
// Purpose: Implement selective capture: absorb matching failures, hand back
//          everything else unchanged.
// Dependencies: crate::{condition, config, error, holder, kind, scope, trace}
// ============================================================================

//! ## Overview
//! A capture call is split into three steps so no caller state needs to be
//! borrowed while the operation runs:
//! 1. [`Invoker::prepare`] validates the arguments and clears the holder.
//! 2. [`run`] executes the operation under the configured scope.
//! 3. [`Invoker::settle`] classifies the result into an [`Outcome`] and stores
//!    absorbed conditions.
//!
//! [`classify`] is pure; it decides `Absorbed`, `Rethrown` or `Completed`
//! without touching any state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;
use std::panic::resume_unwind;

use crate::condition::CapturedCondition;
use crate::condition::PanicCondition;
use crate::condition::Raise;
use crate::condition::panic_kind;
use crate::config::CatcherConfig;
use crate::config::ConfigError;
use crate::error::CaptureError;
use crate::error::InvalidArgument;
use crate::holder::ConditionHolder;
use crate::kind::Kind;
use crate::kind::KindHierarchy;
use crate::scope::ConditionScope;
use crate::trace::CaptureEvent;
use crate::trace::CaptureOperation;
use crate::trace::CaptureStage;
use crate::trace::CaptureTrace;

// ============================================================================
// SECTION: Arguments
// ============================================================================

/// Panic payload as produced by [`catch_unwind`].
pub type PanicPayload = Box<dyn Any + Send + 'static>;

/// Expected-kind argument slot.
///
/// # Invariants
/// - `Only(None)` is a contract violation and is rejected before anything runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    /// Argument omitted: capture any failure.
    Any,
    /// Argument supplied; `None` means it was supplied but absent.
    Only(Option<Kind>),
}

impl ExpectedKind {
    /// Filter on `T` and its declared subkinds.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Only(Some(Kind::of::<T>()))
    }
}

impl From<Kind> for ExpectedKind {
    fn from(kind: Kind) -> Self {
        Self::Only(Some(kind))
    }
}

impl From<Option<Kind>> for ExpectedKind {
    fn from(kind: Option<Kind>) -> Self {
        Self::Only(kind)
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// What the operation did when it ran.
pub enum Raised<E> {
    /// Returned `Ok`.
    Nothing,
    /// Returned `Err`.
    Error(E),
    /// Panicked; only produced when the scope intercepts panics.
    Panic(PanicPayload),
}

/// A failure that did not match the filter.
pub enum Escape<E> {
    /// The original `Err` value.
    Error(E),
    /// The original panic payload.
    Panic(PanicPayload),
}

/// Classified result of one invocation.
pub enum Outcome<E> {
    /// A matching failure was stored.
    Absorbed(CapturedCondition),
    /// A non-matching failure must reach the caller unchanged.
    Rethrown(Escape<E>),
    /// The operation did not fail.
    Completed,
}

impl<E> Outcome<E> {
    /// Returns the stage this outcome ends in.
    #[must_use]
    pub const fn stage(&self) -> CaptureStage {
        match self {
            Self::Absorbed(_) => CaptureStage::Absorbed,
            Self::Rethrown(_) => CaptureStage::Rethrown,
            Self::Completed => CaptureStage::Completed,
        }
    }

    /// Turns the outcome back into ordinary control flow.
    ///
    /// A rethrown panic is resumed with its original payload and does not
    /// return.
    ///
    /// # Errors
    ///
    /// Returns the original error for a rethrown `Err`.
    pub fn propagate(self) -> Result<(), E> {
        match self {
            Self::Absorbed(_) | Self::Completed => Ok(()),
            Self::Rethrown(Escape::Error(error)) => Err(error),
            Self::Rethrown(Escape::Panic(payload)) => resume_unwind(payload),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Escape<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error(error) => f.debug_tuple("Error").field(error).finish(),
            Self::Panic(payload) => {
                f.debug_tuple("Panic").field(&PanicCondition::from_payload(payload.as_ref())).finish()
            }
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Outcome<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absorbed(condition) => f.debug_tuple("Absorbed").field(condition).finish(),
            Self::Rethrown(escape) => f.debug_tuple("Rethrown").field(escape).finish(),
            Self::Completed => f.write_str("Completed"),
        }
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

/// Runs `operation`, intercepting panics only when `scope` asks for it.
pub fn run<F, R, E>(scope: ConditionScope, operation: F) -> Raised<E>
where
    F: FnOnce() -> Result<R, E>,
{
    if scope.catches_panics() {
        match catch_unwind(AssertUnwindSafe(operation)) {
            Ok(Ok(_)) => Raised::Nothing,
            Ok(Err(error)) => Raised::Error(error),
            Err(payload) => Raised::Panic(payload),
        }
    } else {
        match operation() {
            Ok(_) => Raised::Nothing,
            Err(error) => Raised::Error(error),
        }
    }
}

/// Classifies a raised failure against `filter`.
///
/// With no filter every failure is absorbed; otherwise the failure's kind
/// must match the filter in `hierarchy`. A panic carrying a
/// [`Condition`](crate::condition::Condition) keeps its kind; any other panic
/// has the kind of [`PanicCondition`].
#[must_use]
pub fn classify<E: Raise>(
    raised: Raised<E>,
    filter: Option<Kind>,
    hierarchy: &KindHierarchy,
    max_cause_depth: usize,
) -> Outcome<E> {
    let accepts = |kind: Kind| filter.is_none_or(|filter| hierarchy.matches(kind, filter));
    match raised {
        Raised::Nothing => Outcome::Completed,
        Raised::Error(error) => {
            if accepts(error.kind()) {
                Outcome::Absorbed(error.into_captured(max_cause_depth))
            } else {
                Outcome::Rethrown(Escape::Error(error))
            }
        }
        Raised::Panic(payload) => {
            if accepts(panic_kind(payload.as_ref())) {
                Outcome::Absorbed(CapturedCondition::from_panic_payload(payload, max_cause_depth))
            } else {
                Outcome::Rethrown(Escape::Panic(payload))
            }
        }
    }
}

// ============================================================================
// SECTION: Invoker
// ============================================================================

/// Capture engine: argument rules, scope, cause depth and kind hierarchy.
///
/// # Invariants
/// - `max_cause_depth` comes from a validated [`CatcherConfig`].
#[derive(Debug, Clone)]
pub struct Invoker {
    /// Failure channels intercepted.
    scope: ConditionScope,
    /// Cause links recorded per captured condition.
    max_cause_depth: usize,
    /// Declared subkind relations.
    hierarchy: KindHierarchy,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::from_validated(CatcherConfig::default(), KindHierarchy::default())
    }
}

impl Invoker {
    /// Creates an invoker, validating `config` first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration is invalid.
    pub fn new(config: CatcherConfig, hierarchy: KindHierarchy) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_validated(config, hierarchy))
    }

    /// Creates an invoker from a configuration already known to be valid.
    pub(crate) const fn from_validated(config: CatcherConfig, hierarchy: KindHierarchy) -> Self {
        Self {
            scope: config.scope,
            max_cause_depth: config.max_cause_depth,
            hierarchy,
        }
    }

    /// Returns the scope.
    #[must_use]
    pub const fn scope(&self) -> ConditionScope {
        self.scope
    }

    /// Returns the cause depth.
    #[must_use]
    pub const fn max_cause_depth(&self) -> usize {
        self.max_cause_depth
    }

    /// Returns the kind hierarchy.
    #[must_use]
    pub const fn hierarchy(&self) -> &KindHierarchy {
        &self.hierarchy
    }

    /// Returns the kind hierarchy for new declarations.
    pub const fn hierarchy_mut(&mut self) -> &mut KindHierarchy {
        &mut self.hierarchy
    }

    /// Validates the arguments, then clears the holder.
    ///
    /// Returns the operation and the resolved filter (`None` = any failure).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] for an absent operation, then for an
    /// explicitly absent filter. The holder is untouched in both cases.
    pub fn prepare<F, T>(
        &self,
        operation_kind: CaptureOperation,
        holder: &mut ConditionHolder,
        trace: &mut T,
        operation: Option<F>,
        expected: ExpectedKind,
    ) -> Result<(F, Option<Kind>), InvalidArgument>
    where
        T: CaptureTrace + ?Sized,
    {
        trace.on_event(&CaptureEvent::new(operation_kind, CaptureStage::Validating));
        let prepared = match validate(self.scope, operation, expected) {
            Ok(prepared) => prepared,
            Err(error) => {
                trace.on_event(&CaptureEvent::new(operation_kind, CaptureStage::Rejected));
                return Err(error);
            }
        };
        holder.clear();
        trace.on_event(&CaptureEvent::new(operation_kind, CaptureStage::Invoking));
        Ok(prepared)
    }

    /// Runs the operation under this invoker's scope.
    pub fn run<F, R, E>(&self, operation: F) -> Raised<E>
    where
        F: FnOnce() -> Result<R, E>,
    {
        run(self.scope, operation)
    }

    /// Classifies what the operation raised and stores an absorbed condition.
    pub fn settle<E, T>(
        &self,
        operation_kind: CaptureOperation,
        holder: &mut ConditionHolder,
        trace: &mut T,
        raised: Raised<E>,
        filter: Option<Kind>,
    ) -> Outcome<E>
    where
        E: Raise,
        T: CaptureTrace + ?Sized,
    {
        let outcome = classify(raised, filter, &self.hierarchy, self.max_cause_depth);
        let event = match &outcome {
            Outcome::Absorbed(condition) => {
                holder.set(condition.clone());
                CaptureEvent::with_kind(operation_kind, CaptureStage::Absorbed, condition.kind())
            }
            Outcome::Rethrown(escape) => {
                CaptureEvent::with_kind(operation_kind, CaptureStage::Rethrown, escape_kind(escape))
            }
            Outcome::Completed => CaptureEvent::new(operation_kind, CaptureStage::Completed),
        };
        trace.on_event(&event);
        outcome
    }

    /// Runs all three steps and returns the tagged outcome.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] when the arguments are rejected.
    pub fn invoke<F, R, E, T>(
        &self,
        operation_kind: CaptureOperation,
        holder: &mut ConditionHolder,
        trace: &mut T,
        operation: Option<F>,
        expected: ExpectedKind,
    ) -> Result<(Outcome<E>, Option<Kind>), InvalidArgument>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
        T: CaptureTrace + ?Sized,
    {
        let (operation, filter) = self.prepare(operation_kind, holder, trace, operation, expected)?;
        let raised = self.run(operation);
        let outcome = self.settle(operation_kind, holder, trace, raised, filter);
        Ok((outcome, filter))
    }

    /// Captures a failure of `operation` into `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::InvalidArgument`] for rejected arguments and
    /// [`CaptureError::Rethrown`] with the original error when its kind does
    /// not match the filter. A non-matching panic is resumed instead.
    pub fn capture<F, R, E, T>(
        &self,
        holder: &mut ConditionHolder,
        trace: &mut T,
        operation: Option<F>,
        expected: ExpectedKind,
    ) -> Result<(), CaptureError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
        T: CaptureTrace + ?Sized,
    {
        let (outcome, _) =
            self.invoke(CaptureOperation::Capture, holder, trace, operation, expected)?;
        outcome.propagate().map_err(CaptureError::Rethrown)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Applies the argument rules in order: operation first, then filter.
fn validate<F>(
    scope: ConditionScope,
    operation: Option<F>,
    expected: ExpectedKind,
) -> Result<(F, Option<Kind>), InvalidArgument> {
    let operation = operation.ok_or_else(InvalidArgument::missing_operation)?;
    let filter = match expected {
        ExpectedKind::Any => None,
        ExpectedKind::Only(Some(kind)) => Some(kind),
        ExpectedKind::Only(None) => return Err(InvalidArgument::missing_kind(scope)),
    };
    Ok((operation, filter))
}

/// Kind reported for an escaping failure.
fn escape_kind<E: Raise>(escape: &Escape<E>) -> Kind {
    match escape {
        Escape::Error(error) => error.kind(),
        Escape::Panic(payload) => panic_kind(payload.as_ref()),
    }
}
