// crates/catch-condition/src/error.rs
// ============================================================================
// Module: Catch Errors
// Description: Failures reported by capture and verify calls.
// Purpose: Separate contract violations, pass-through failures and verify
//          failures so tests can tell them apart.
// Dependencies: crate::{condition, kind, scope}, thiserror
// ============================================================================

//! ## Overview
//! Three categories surface to the caller:
//! - [`InvalidArgument`]: the caller broke the argument contract; raised before
//!   the holder is touched.
//! - `Rethrown`: a failure that did not match the filter, handed back as the
//!   original value.
//! - [`ConditionNotRaised`]: verify-only, nothing was absorbed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::condition::Raise;
use crate::kind::Kind;
use crate::scope::ConditionScope;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message for a missing operation.
pub const MISSING_OPERATION_MESSAGE: &str = "obj must not be null";
/// Message for a missing condition passed to a holder.
pub const MISSING_CONDITION_MESSAGE: &str = "condition must not be null";

// ============================================================================
// SECTION: Invalid Argument
// ============================================================================

/// Caller contract violation.
///
/// # Invariants
/// - Raised before any holder mutation or invocation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidArgument {
    /// Human-readable description of the violated contract.
    message: String,
}

impl InvalidArgument {
    /// The operation was absent.
    #[must_use]
    pub fn missing_operation() -> Self {
        Self {
            message: MISSING_OPERATION_MESSAGE.to_string(),
        }
    }

    /// The expected kind was passed explicitly but absent.
    #[must_use]
    pub fn missing_kind(scope: ConditionScope) -> Self {
        Self {
            message: format!("{} must not be null", scope.filter_argument()),
        }
    }

    /// An absent condition was offered to a holder.
    #[must_use]
    pub fn missing_condition() -> Self {
        Self {
            message: MISSING_CONDITION_MESSAGE.to_string(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

// ============================================================================
// SECTION: Condition Not Raised
// ============================================================================

/// Verify failure: the operation produced nothing that was absorbed.
///
/// # Invariants
/// - Only raised when the holder is empty after a normal capture return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ConditionNotRaised {
    /// Rendered assertion message.
    message: String,
    /// Expected kind, when a filter was given.
    expected: Option<Kind>,
}

impl ConditionNotRaised {
    /// Builds the failure for `scope`, worded after whether a filter was given.
    #[must_use]
    pub fn new(scope: ConditionScope, expected: Option<Kind>) -> Self {
        let message = match expected {
            Some(kind) => format!(
                "Neither {} of type {kind} nor another {} was thrown",
                scope.noun_with_article(),
                scope.noun()
            ),
            None => format!("{} expected but not thrown", scope.title_noun()),
        };
        Self {
            message,
            expected,
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the expected kind, when a filter was given.
    #[must_use]
    pub const fn expected(&self) -> Option<Kind> {
        self.expected
    }
}

// ============================================================================
// SECTION: Capture Error
// ============================================================================

/// Failure of a capture call.
///
/// Display and `source()` of a rethrown failure are those of the original
/// value, so propagating it with `?` keeps its cause chain.
#[derive(Debug)]
pub enum CaptureError<E> {
    /// Arguments were rejected before anything ran.
    InvalidArgument(InvalidArgument),
    /// The operation failed with a kind outside the filter; the original value.
    Rethrown(E),
}

impl<E> CaptureError<E> {
    /// Returns the rejected argument error, if any.
    #[must_use]
    pub const fn invalid_argument(&self) -> Option<&InvalidArgument> {
        match self {
            Self::InvalidArgument(error) => Some(error),
            Self::Rethrown(_) => None,
        }
    }

    /// Returns the rethrown failure, if any.
    #[must_use]
    pub const fn rethrown(&self) -> Option<&E> {
        match self {
            Self::Rethrown(error) => Some(error),
            Self::InvalidArgument(_) => None,
        }
    }

    /// Consumes the error, returning the rethrown failure, if any.
    #[must_use]
    pub fn into_rethrown(self) -> Option<E> {
        match self {
            Self::Rethrown(error) => Some(error),
            Self::InvalidArgument(_) => None,
        }
    }
}

// ============================================================================
// SECTION: Verify Error
// ============================================================================

/// Failure of a verify call.
///
/// Like [`CaptureError`], a rethrown failure keeps its own display and
/// `source()` chain.
#[derive(Debug)]
pub enum VerifyError<E> {
    /// Arguments were rejected before anything ran.
    InvalidArgument(InvalidArgument),
    /// The operation failed with a kind outside the filter; the original value.
    Rethrown(E),
    /// Nothing was absorbed.
    NotRaised(ConditionNotRaised),
}

impl<E> VerifyError<E> {
    /// Returns the rejected argument error, if any.
    #[must_use]
    pub const fn invalid_argument(&self) -> Option<&InvalidArgument> {
        match self {
            Self::InvalidArgument(error) => Some(error),
            Self::Rethrown(_) | Self::NotRaised(_) => None,
        }
    }

    /// Returns the rethrown failure, if any.
    #[must_use]
    pub const fn rethrown(&self) -> Option<&E> {
        match self {
            Self::Rethrown(error) => Some(error),
            Self::InvalidArgument(_) | Self::NotRaised(_) => None,
        }
    }

    /// Consumes the error, returning the rethrown failure, if any.
    #[must_use]
    pub fn into_rethrown(self) -> Option<E> {
        match self {
            Self::Rethrown(error) => Some(error),
            Self::InvalidArgument(_) | Self::NotRaised(_) => None,
        }
    }

    /// Returns the verify failure, if any.
    #[must_use]
    pub const fn not_raised(&self) -> Option<&ConditionNotRaised> {
        match self {
            Self::NotRaised(error) => Some(error),
            Self::InvalidArgument(_) | Self::Rethrown(_) => None,
        }
    }
}

impl<E: Raise> fmt::Display for CaptureError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(error) => fmt::Display::fmt(error, f),
            Self::Rethrown(error) => fmt::Display::fmt(error.as_error(), f),
        }
    }
}

impl<E: Raise + fmt::Debug> StdError for CaptureError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidArgument(error) => error.source(),
            Self::Rethrown(error) => error.as_error().source(),
        }
    }
}

impl<E> From<InvalidArgument> for CaptureError<E> {
    fn from(error: InvalidArgument) -> Self {
        Self::InvalidArgument(error)
    }
}

impl<E: Raise> fmt::Display for VerifyError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(error) => fmt::Display::fmt(error, f),
            Self::Rethrown(error) => fmt::Display::fmt(error.as_error(), f),
            Self::NotRaised(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl<E: Raise + fmt::Debug> StdError for VerifyError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidArgument(error) => error.source(),
            Self::Rethrown(error) => error.as_error().source(),
            Self::NotRaised(error) => error.source(),
        }
    }
}

impl<E> From<InvalidArgument> for VerifyError<E> {
    fn from(error: InvalidArgument) -> Self {
        Self::InvalidArgument(error)
    }
}

impl<E> From<ConditionNotRaised> for VerifyError<E> {
    fn from(error: ConditionNotRaised) -> Self {
        Self::NotRaised(error)
    }
}

impl<E> From<CaptureError<E>> for VerifyError<E> {
    fn from(error: CaptureError<E>) -> Self {
        match error {
            CaptureError::InvalidArgument(error) => Self::InvalidArgument(error),
            CaptureError::Rethrown(error) => Self::Rethrown(error),
        }
    }
}
