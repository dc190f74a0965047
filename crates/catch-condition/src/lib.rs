// crates/catch-condition/src/lib.rs
// ============================================================================
// Module: Catch Condition Root
// Description: Public API surface for capture-and-verify test support.
// Purpose: Wire together kinds, conditions, holder, invoker and verifier.
// Dependencies: crate::{ambient, catcher, condition, config, error, holder, invoke, kind,
//              scope, trace, verify}
// ============================================================================

//! ## Overview
//! A test hands an operation that is expected to fail to a [`Catcher`]. The
//! catcher runs it, absorbs a failure whose kind matches the optional filter,
//! and keeps it for later assertions. Failures outside the filter reach the
//! test unchanged. `verify` additionally fails with [`ConditionNotRaised`]
//! when nothing was absorbed.
//!
//! Returned errors are always eligible; panics are eligible when the scope is
//! [`ConditionScope::ErrorsAndPanics`].

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod ambient;
pub mod catcher;
pub mod condition;
pub mod config;
pub mod error;
pub mod holder;
pub mod invoke;
pub mod kind;
pub mod scope;
pub mod trace;
pub mod verify;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catcher::Catcher;
pub use condition::BoxError;
pub use condition::CapturedCondition;
pub use condition::Condition;
pub use condition::ConditionOrigin;
pub use condition::PanicCondition;
pub use condition::Raise;
pub use condition::panic_kind;
pub use config::CatcherConfig;
pub use config::ConfigError;
pub use error::CaptureError;
pub use error::ConditionNotRaised;
pub use error::InvalidArgument;
pub use error::VerifyError;
pub use holder::ConditionHolder;
pub use invoke::Escape;
pub use invoke::ExpectedKind;
pub use invoke::Invoker;
pub use invoke::Outcome;
pub use invoke::Raised;
pub use invoke::classify;
pub use kind::HierarchyError;
pub use kind::Kind;
pub use kind::KindHierarchy;
pub use scope::ConditionScope;
pub use trace::CaptureEvent;
pub use trace::CaptureOperation;
pub use trace::CaptureStage;
pub use trace::CaptureTrace;
pub use trace::NoopTrace;
pub use trace::RecordingTrace;
pub use verify::Verifier;
