// crates/catch-condition/src/scope.rs
// ============================================================================
// Module: Condition Scope
// Description: Failure channels a catcher intercepts and their vocabulary.
// Purpose: Keep scope-dependent messages in one place.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Returned errors are the "exception" channel; panics widen it to the
//! "throwable" channel. The scope also fixes the wording used by argument
//! validation and verification failures.

use serde::Deserialize;
use serde::Serialize;

/// Failure channels intercepted by a catcher.
///
/// # Invariants
/// - Variants are stable for configuration and message rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionScope {
    /// Only `Err` values returned by the operation; panics pass through.
    #[default]
    Errors,
    /// Returned errors and panics.
    ErrorsAndPanics,
}

impl ConditionScope {
    /// Returns a stable label for the scope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Errors => "errors",
            Self::ErrorsAndPanics => "errors_and_panics",
        }
    }

    /// Returns true when panics are intercepted.
    #[must_use]
    pub const fn catches_panics(self) -> bool {
        matches!(self, Self::ErrorsAndPanics)
    }

    /// Lower-case noun for a single failure in this scope.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Errors => "exception",
            Self::ErrorsAndPanics => "throwable",
        }
    }

    /// Capitalized noun, used at the start of a sentence.
    #[must_use]
    pub const fn title_noun(self) -> &'static str {
        match self {
            Self::Errors => "Exception",
            Self::ErrorsAndPanics => "Throwable",
        }
    }

    /// Noun with its indefinite article.
    #[must_use]
    pub const fn noun_with_article(self) -> &'static str {
        match self {
            Self::Errors => "an exception",
            Self::ErrorsAndPanics => "a throwable",
        }
    }

    /// Name of the expected-kind argument in validation messages.
    #[must_use]
    pub const fn filter_argument(self) -> &'static str {
        match self {
            Self::Errors => "exceptionClazz",
            Self::ErrorsAndPanics => "throwableClazz",
        }
    }
}
