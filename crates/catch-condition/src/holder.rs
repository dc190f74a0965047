// crates/catch-condition/src/holder.rs
// ============================================================================
// Module: Condition Holder
// Description: Single slot holding the most recently captured condition.
// Purpose: Give tests a stable place to read the last capture from.
// Dependencies: crate::{condition, error}
// ============================================================================

//! ## Overview
//! The holder owns at most one [`CapturedCondition`]. Setting a new one
//! discards the previous. The holder does no locking; each logical thread of
//! test execution owns its own instance.

use crate::condition::CapturedCondition;
use crate::error::InvalidArgument;

/// Single-slot store for the last captured condition.
///
/// # Invariants
/// - Holds at most one condition.
/// - Reads never mutate the slot.
#[derive(Debug, Clone, Default)]
pub struct ConditionHolder {
    /// The slot.
    slot: Option<CapturedCondition>,
}

impl ConditionHolder {
    /// Creates an empty holder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: None,
        }
    }

    /// Discards the stored condition. Idempotent.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Replaces the stored condition.
    pub fn set(&mut self, condition: CapturedCondition) {
        self.slot = Some(condition);
    }

    /// Replaces the stored condition, rejecting an absent one.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] when `condition` is `None`; the slot is left
    /// as it was.
    pub fn try_set(&mut self, condition: Option<CapturedCondition>) -> Result<(), InvalidArgument> {
        let condition = condition.ok_or_else(InvalidArgument::missing_condition)?;
        self.set(condition);
        Ok(())
    }

    /// Returns the stored condition.
    #[must_use]
    pub const fn get(&self) -> Option<&CapturedCondition> {
        self.slot.as_ref()
    }

    /// Moves the stored condition out, leaving the holder empty.
    pub const fn take(&mut self) -> Option<CapturedCondition> {
        self.slot.take()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
