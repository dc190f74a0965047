// crates/catch-condition/src/trace.rs
// ============================================================================
// Module: Capture Trace
// Description: Observer hooks for capture and verify state transitions.
// Purpose: Expose the per-call state machine without a logging dependency.
// Dependencies: crate::kind, serde
// ============================================================================

//! ## Overview
//! Every capture or verify call walks `Validating → Invoking → {Absorbed,
//! Rethrown, Completed}`; verify may end in `NotRaised`, and validation may
//! end in `Rejected`. A [`CaptureTrace`] sees each transition. [`NoopTrace`]
//! discards them and [`RecordingTrace`] keeps them in order.

use serde::Serialize;

use crate::kind::Kind;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Public operation that produced an event.
///
/// # Invariants
/// - Variants are stable for trace labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureOperation {
    /// `capture` family.
    Capture,
    /// `verify` family.
    Verify,
}

impl CaptureOperation {
    /// Returns a stable label for the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Capture => "capture",
            Self::Verify => "verify",
        }
    }
}

/// State reached by a capture or verify call.
///
/// # Invariants
/// - Variants are stable for trace labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStage {
    /// Arguments are being checked.
    Validating,
    /// Arguments were rejected; nothing ran.
    Rejected,
    /// The operation is running.
    Invoking,
    /// A matching failure was stored in the holder.
    Absorbed,
    /// A non-matching failure was handed back to the caller.
    Rethrown,
    /// The operation finished without failing.
    Completed,
    /// Verify found the holder empty.
    NotRaised,
}

impl CaptureStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Invoking => "invoking",
            Self::Absorbed => "absorbed",
            Self::Rethrown => "rethrown",
            Self::Completed => "completed",
            Self::NotRaised => "not_raised",
        }
    }

    /// Returns true for stages no further transition follows, for either
    /// operation.
    ///
    /// `Completed` is excluded: it ends a capture but a verify goes on to
    /// `NotRaised`. Use [`CaptureStage::ends`] to count finished calls.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Absorbed | Self::Rethrown | Self::NotRaised)
    }

    /// Returns true when this stage is the last one `operation` reports.
    #[must_use]
    pub const fn ends(self, operation: CaptureOperation) -> bool {
        match self {
            Self::Completed => matches!(operation, CaptureOperation::Capture),
            _ => self.is_terminal(),
        }
    }
}

// ============================================================================
// SECTION: Event
// ============================================================================

/// A single state transition.
///
/// # Invariants
/// - `kind` is set for `Absorbed` and `Rethrown`, `None` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureEvent {
    /// Operation that produced the event.
    pub operation: CaptureOperation,
    /// Stage reached.
    pub stage: CaptureStage,
    /// Kind of the failure, when one was raised.
    pub kind: Option<Kind>,
}

impl CaptureEvent {
    /// Builds an event without a kind.
    #[must_use]
    pub const fn new(operation: CaptureOperation, stage: CaptureStage) -> Self {
        Self {
            operation,
            stage,
            kind: None,
        }
    }

    /// Returns true when this event is the last one of its call.
    #[must_use]
    pub const fn ends_call(&self) -> bool {
        self.stage.ends(self.operation)
    }

    /// Builds an event carrying the failure kind.
    #[must_use]
    pub const fn with_kind(operation: CaptureOperation, stage: CaptureStage, kind: Kind) -> Self {
        Self {
            operation,
            stage,
            kind: Some(kind),
        }
    }
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Observer for capture and verify transitions.
pub trait CaptureTrace {
    /// Called on every transition.
    fn on_event(&mut self, event: &CaptureEvent);
}

/// No-op trace hook.
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTrace;

impl CaptureTrace for NoopTrace {
    fn on_event(&mut self, _event: &CaptureEvent) {}
}

/// Trace hook that keeps every event in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingTrace {
    /// Recorded events.
    events: Vec<CaptureEvent>,
}

impl RecordingTrace {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    /// Returns the recorded events.
    #[must_use]
    pub fn events(&self) -> &[CaptureEvent] {
        &self.events
    }

    /// Returns the recorded stages.
    #[must_use]
    pub fn stages(&self) -> Vec<CaptureStage> {
        self.events.iter().map(|event| event.stage).collect()
    }

    /// Drops every recorded event.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl CaptureTrace for RecordingTrace {
    fn on_event(&mut self, event: &CaptureEvent) {
        self.events.push(*event);
    }
}

impl<T: CaptureTrace + ?Sized> CaptureTrace for &mut T {
    fn on_event(&mut self, event: &CaptureEvent) {
        (**self).on_event(event);
    }
}
