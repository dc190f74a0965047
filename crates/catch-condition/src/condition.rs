// crates/catch-condition/src/condition.rs
// ============================================================================
// Module: Conditions
// Description: Failure carriers raised by operations and captured by catchers.
// Purpose: Preserve the concrete kind of a failure across type erasure.
// Dependencies: crate::kind, thiserror
// ============================================================================

//! ## Overview
//! Operations report failures either as a concrete error type or as a
//! [`Condition`], a type-erased carrier that remembers the kind it was built
//! from. The [`Raise`] trait is the seam the invoker uses to inspect a failure
//! by reference and, only when it is absorbed, convert it into a
//! [`CapturedCondition`]. Rejected failures are handed back untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::DEFAULT_MAX_CAUSE_DEPTH;
use crate::kind::Kind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message recorded for panics whose payload is neither `&str` nor `String`.
pub const NON_STRING_PANIC_MESSAGE: &str = "Box<dyn Any>";

/// Boxed, thread-safe error trait object.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

// ============================================================================
// SECTION: Condition Carrier
// ============================================================================

/// Type-erased failure that remembers its concrete kind.
///
/// Any `E: Error + Send + Sync + 'static` converts into a `Condition`, so
/// operations mixing several error types can return `Result<R, Condition>`
/// and use `?`.
///
/// # Invariants
/// - `kind` is the kind of the value inside `error`, except for
///   [`Condition::from_boxed`] where the concrete type is no longer known.
pub struct Condition {
    /// Kind recorded at construction.
    kind: Kind,
    /// Underlying failure.
    error: BoxError,
}

impl Condition {
    /// Wraps a concrete error.
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind: Kind::of::<E>(),
            error: Box::new(error),
        }
    }

    /// Wraps an already boxed error.
    ///
    /// The concrete type is erased, so the kind is that of
    /// `dyn Error + Send + Sync`.
    #[must_use]
    pub fn from_boxed(error: BoxError) -> Self {
        Self {
            kind: Kind::of::<dyn StdError + Send + Sync>(),
            error,
        }
    }

    /// Returns the recorded kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns true when the underlying error is an `E`.
    #[must_use]
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.error.is::<E>()
    }

    /// Returns a reference to the underlying error when it is an `E`.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.downcast_ref::<E>()
    }

    /// Recovers the original error when it is an `E`.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when the underlying error is not an `E`.
    pub fn downcast<E: StdError + 'static>(self) -> Result<E, Self> {
        let kind = self.kind;
        match self.error.downcast::<E>() {
            Ok(error) => Ok(*error),
            Err(error) => Err(Self {
                kind,
                error,
            }),
        }
    }

    /// Returns the underlying boxed error.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.error
    }
}

impl<E> From<E> for Condition
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl AsRef<dyn StdError + Send + Sync> for Condition {
    fn as_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("kind", &self.kind).field("error", &self.error).finish()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

// ============================================================================
// SECTION: Raise Seam
// ============================================================================

/// A failure an operation can report through `Err`.
///
/// Implemented for every `E: Error + Send + Sync + 'static` and for
/// [`Condition`].
pub trait Raise: Sized {
    /// Returns the kind used for filter matching.
    fn kind(&self) -> Kind;

    /// Converts the failure into a captured condition.
    fn into_captured(self, max_cause_depth: usize) -> CapturedCondition;

    /// Returns the failure as an error trait object.
    fn as_error(&self) -> &(dyn StdError + 'static);
}

impl<E> Raise for E
where
    E: StdError + Send + Sync + 'static,
{
    fn kind(&self) -> Kind {
        Kind::of::<E>()
    }

    fn into_captured(self, max_cause_depth: usize) -> CapturedCondition {
        CapturedCondition::from_parts(
            Kind::of::<E>(),
            Box::new(self),
            ConditionOrigin::Returned,
            max_cause_depth,
        )
    }

    fn as_error(&self) -> &(dyn StdError + 'static) {
        self
    }
}

impl Raise for Condition {
    fn kind(&self) -> Kind {
        self.kind
    }

    fn into_captured(self, max_cause_depth: usize) -> CapturedCondition {
        CapturedCondition::from_parts(
            self.kind,
            self.error,
            ConditionOrigin::Returned,
            max_cause_depth,
        )
    }

    fn as_error(&self) -> &(dyn StdError + 'static) {
        &*self.error
    }
}

// ============================================================================
// SECTION: Panic Condition
// ============================================================================

/// Kind a panic payload is matched under.
///
/// A [`Condition`] payload keeps the kind it was built with, so typed
/// failures can travel through a panic via `panic_any(Condition::new(..))`.
/// Every other payload is a [`PanicCondition`].
#[must_use]
pub fn panic_kind(payload: &(dyn Any + Send)) -> Kind {
    payload.downcast_ref::<Condition>().map_or_else(Kind::of::<PanicCondition>, Condition::kind)
}

/// Error value standing in for a captured panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PanicCondition {
    /// Panic message, or [`NON_STRING_PANIC_MESSAGE`].
    message: String,
}

impl PanicCondition {
    /// Creates a panic condition with an explicit message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts the message from a panic payload.
    #[must_use]
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|message| (*message).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .or_else(|| payload.downcast_ref::<Condition>().map(ToString::to_string))
            .unwrap_or_else(|| NON_STRING_PANIC_MESSAGE.to_string());
        Self {
            message,
        }
    }

    /// Returns the panic message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// SECTION: Captured Condition
// ============================================================================

/// How a captured failure left the operation.
///
/// # Invariants
/// - Variants are stable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionOrigin {
    /// The operation returned `Err`.
    Returned,
    /// The operation panicked.
    Panicked,
}

/// The most recently captured failure.
///
/// # Invariants
/// - Read-only once built; clones share the same underlying error.
/// - `causes` holds at most the `max_cause_depth` it was built with.
#[derive(Clone)]
pub struct CapturedCondition {
    /// Kind the failure was matched under.
    kind: Kind,
    /// Display text of the failure.
    message: String,
    /// Display text of the `source()` chain, outermost first.
    causes: Vec<String>,
    /// Channel the failure came through.
    origin: ConditionOrigin,
    /// Underlying failure.
    error: Arc<dyn StdError + Send + Sync + 'static>,
}

impl CapturedCondition {
    /// Captures a concrete error directly, e.g. to pre-seed a holder.
    #[must_use]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        error.into_captured(DEFAULT_MAX_CAUSE_DEPTH)
    }

    /// Captures a panic payload.
    ///
    /// A [`Condition`] payload keeps its kind and error; see [`panic_kind`].
    #[must_use]
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        Self::from_panic_payload(payload, DEFAULT_MAX_CAUSE_DEPTH)
    }

    /// Captures a panic payload, walking at most `max_cause_depth` causes.
    pub(crate) fn from_panic_payload(payload: Box<dyn Any + Send>, max_cause_depth: usize) -> Self {
        match payload.downcast::<Condition>() {
            Ok(condition) => Self::from_parts(
                condition.kind,
                condition.error,
                ConditionOrigin::Panicked,
                max_cause_depth,
            ),
            Err(payload) => Self::from_parts(
                Kind::of::<PanicCondition>(),
                Box::new(PanicCondition::from_payload(payload.as_ref())),
                ConditionOrigin::Panicked,
                max_cause_depth,
            ),
        }
    }

    /// Builds a captured condition, walking at most `max_cause_depth` causes.
    pub(crate) fn from_parts(
        kind: Kind,
        error: BoxError,
        origin: ConditionOrigin,
        max_cause_depth: usize,
    ) -> Self {
        let message = error.to_string();
        let causes = cause_chain(&*error, max_cause_depth);
        Self {
            kind,
            message,
            causes,
            origin,
            error: Arc::from(error),
        }
    }

    /// Returns the kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the recorded cause messages, outermost first.
    #[must_use]
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    /// Returns how the failure left the operation.
    #[must_use]
    pub const fn origin(&self) -> ConditionOrigin {
        self.origin
    }

    /// Returns the underlying error.
    #[must_use]
    pub fn error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Returns true when the underlying error is an `E`.
    #[must_use]
    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.error.as_ref().is::<E>()
    }

    /// Returns a reference to the underlying error when it is an `E`.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.as_ref().downcast_ref::<E>()
    }

    /// Returns true when both values share the same underlying error.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.error, &other.error)
    }
}

impl fmt::Debug for CapturedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedCondition")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("causes", &self.causes)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CapturedCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Collects `source()` messages, stopping after `max_depth` entries.
fn cause_chain(error: &(dyn StdError + 'static), max_depth: usize) -> Vec<String> {
    let mut causes = Vec::new();
    let mut next = error.source();
    while let Some(cause) = next {
        if causes.len() >= max_depth {
            break;
        }
        causes.push(cause.to_string());
        next = cause.source();
    }
    causes
}
