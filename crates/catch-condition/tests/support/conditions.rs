// crates/catch-condition/tests/support/conditions.rs
// ============================================================================
// Module: Condition Fixtures
// Description: Failure types and a kind hierarchy shared by integration tests.
// ============================================================================
//! ## Overview
//! A small runtime-failure family:
//!
//! ```text
//! RuntimeFault
//! ├── IndexRangeError
//! │   └── ArrayIndexRangeError
//! └── IllegalArgumentError
//! ```
//!
//! plus a sentinel used to pre-seed holders and a wrapper carrying a cause.

#![allow(dead_code, reason = "Not every test binary uses every fixture.")]

use catch_condition::CapturedCondition;
use catch_condition::KindHierarchy;
use thiserror::Error;

// ============================================================================
// SECTION: Family Markers
// ============================================================================

/// Root of the runtime-failure family; never instantiated.
pub enum RuntimeFault {}

// ============================================================================
// SECTION: Failure Types
// ============================================================================

/// Read outside a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Index {index} out of bounds for length {length}")]
pub struct IndexRangeError {
    /// Requested index.
    pub index: usize,
    /// Sequence length.
    pub length: usize,
}

/// More specific out-of-range read on a fixed-size array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Array index {index} out of bounds for length {length}")]
pub struct ArrayIndexRangeError {
    /// Requested index.
    pub index: usize,
    /// Array length.
    pub length: usize,
}

/// Rejected argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal argument: {0}")]
pub struct IllegalArgumentError(pub String);

/// Unrelated failure used to pre-seed holders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("retry failed: {detail}")]
pub struct RetryError {
    /// Detail text.
    pub detail: String,
}

/// Failure wrapping an [`IndexRangeError`] as its source.
#[derive(Debug, Error)]
#[error("lookup failed")]
pub struct LookupError {
    /// Underlying range failure.
    #[source]
    pub source: IndexRangeError,
}

/// Failure carrying an arbitrarily long source chain.
#[derive(Debug, Error)]
#[error("layer {depth}")]
pub struct LayeredError {
    /// Depth of this layer; `0` has no source.
    pub depth: usize,
    /// Next layer down.
    #[source]
    pub source: Option<Box<LayeredError>>,
}

impl LayeredError {
    /// Builds a chain of `depth + 1` layers.
    pub fn chain(depth: usize) -> Self {
        let mut current = Self {
            depth: 0,
            source: None,
        };
        for layer in 1 ..= depth {
            current = Self {
                depth: layer,
                source: Some(Box::new(current)),
            };
        }
        current
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads `items[index]`, failing with [`IndexRangeError`] when out of range.
///
/// # Errors
/// Returns [`IndexRangeError`] when `index >= items.len()`.
pub fn checked_get<T: Clone>(items: &[T], index: usize) -> Result<T, IndexRangeError> {
    items.get(index).cloned().ok_or(IndexRangeError {
        index,
        length: items.len(),
    })
}

/// Hierarchy for the runtime-failure family.
pub fn runtime_hierarchy() -> KindHierarchy {
    let mut hierarchy = KindHierarchy::new();
    hierarchy.declare_subkind::<IndexRangeError, RuntimeFault>().unwrap();
    hierarchy.declare_subkind::<ArrayIndexRangeError, IndexRangeError>().unwrap();
    hierarchy.declare_subkind::<IllegalArgumentError, RuntimeFault>().unwrap();
    hierarchy
}

/// Sentinel condition for pre-seeding holders.
pub fn sentinel() -> CapturedCondition {
    CapturedCondition::new(RetryError {
        detail: "detail".to_string(),
    })
}
