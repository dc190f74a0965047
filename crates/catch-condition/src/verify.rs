// crates/catch-condition/src/verify.rs
// ============================================================================
// Module: Verifier
// Description: Capture plus the requirement that something was absorbed.
// Purpose: Turn "nothing was raised" into a distinguishable test failure.
// Dependencies: crate::{condition, error, holder, invoke, kind, trace}
// ============================================================================

//! ## Overview
//! The verifier delegates to the [`Invoker`] with the same argument rules and
//! the same selective rethrow. Only when capture returns normally does it look
//! at the holder: an empty holder means the operation completed, which fails
//! with [`ConditionNotRaised`].

use crate::condition::Raise;
use crate::error::ConditionNotRaised;
use crate::error::VerifyError;
use crate::holder::ConditionHolder;
use crate::invoke::ExpectedKind;
use crate::invoke::Invoker;
use crate::kind::Kind;
use crate::trace::CaptureEvent;
use crate::trace::CaptureOperation;
use crate::trace::CaptureStage;
use crate::trace::CaptureTrace;

/// Verify front-end over an [`Invoker`].
#[derive(Debug, Clone, Copy)]
pub struct Verifier<'a> {
    /// Engine doing the capture.
    invoker: &'a Invoker,
}

impl<'a> Verifier<'a> {
    /// Wraps an invoker.
    #[must_use]
    pub const fn new(invoker: &'a Invoker) -> Self {
        Self {
            invoker,
        }
    }

    /// Captures a failure of `operation` and requires that one was absorbed.
    ///
    /// On success the holder keeps the absorbed condition.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidArgument`] for rejected arguments,
    /// [`VerifyError::Rethrown`] with the original error for a non-matching
    /// kind, and [`VerifyError::NotRaised`] when the operation completed.
    pub fn verify<F, R, E, T>(
        &self,
        holder: &mut ConditionHolder,
        trace: &mut T,
        operation: Option<F>,
        expected: ExpectedKind,
    ) -> Result<(), VerifyError<E>>
    where
        F: FnOnce() -> Result<R, E>,
        E: Raise,
        T: CaptureTrace + ?Sized,
    {
        let (outcome, filter) =
            self.invoker.invoke(CaptureOperation::Verify, holder, trace, operation, expected)?;
        outcome.propagate().map_err(VerifyError::Rethrown)?;
        self.check(holder, trace, filter)?;
        Ok(())
    }

    /// Fails when the holder is empty after a normal capture return.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionNotRaised`] worded after the scope and `filter`.
    pub fn check<T>(
        &self,
        holder: &ConditionHolder,
        trace: &mut T,
        filter: Option<Kind>,
    ) -> Result<(), ConditionNotRaised>
    where
        T: CaptureTrace + ?Sized,
    {
        if holder.is_empty() {
            trace.on_event(&CaptureEvent::new(CaptureOperation::Verify, CaptureStage::NotRaised));
            return Err(ConditionNotRaised::new(self.invoker.scope(), filter));
        }
        Ok(())
    }
}
