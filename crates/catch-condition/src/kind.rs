// crates/catch-condition/src/kind.rs
// ============================================================================
// Module: Condition Kinds
// Description: Runtime kind identity and declared subkind relations.
// Purpose: Decide whether a raised kind satisfies an expected-kind filter.
// Dependencies: std::any, std::collections, thiserror
// ============================================================================

//! ## Overview
//! A [`Kind`] is the runtime identity of a failure type. Rust has no class
//! inheritance, so "is-a" relations between kinds are declared explicitly on a
//! [`KindHierarchy`]. A filter accepts the exact kind and every kind that
//! reaches it through declared parents.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::TypeId;
use std::any::type_name;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use thiserror::Error;

// ============================================================================
// SECTION: Kind
// ============================================================================

/// Runtime type identity of a failure.
///
/// # Invariants
/// - Equality and hashing use the [`TypeId`] only; the name is diagnostic.
#[derive(Clone, Copy)]
pub struct Kind {
    /// Type identity.
    id: TypeId,
    /// Fully qualified type name.
    name: &'static str,
}

impl Kind {
    /// Returns the kind of `T`.
    ///
    /// `T` does not have to be an error type: marker types can name a family
    /// of kinds that only exists in a [`KindHierarchy`].
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the type identity.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true when this kind is `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Kind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Kind {}

impl Hash for Kind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Kind").field(&self.name).finish()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// ============================================================================
// SECTION: Hierarchy Errors
// ============================================================================

/// Errors raised while declaring subkind relations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// The declaration would make a kind its own ancestor.
    #[error("declaring {child} as a subkind of {parent} would create a cycle")]
    Cycle {
        /// Kind declared as the child.
        child: Kind,
        /// Kind declared as the parent.
        parent: Kind,
    },
}

// ============================================================================
// SECTION: Kind Hierarchy
// ============================================================================

/// Declared "is-a" relations between kinds.
///
/// # Invariants
/// - The parent graph is acyclic; [`KindHierarchy::declare`] rejects cycles.
/// - Parent lists hold no duplicates.
#[derive(Debug, Clone, Default)]
pub struct KindHierarchy {
    /// Direct parents keyed by child kind, in declaration order.
    parents: HashMap<Kind, Vec<Kind>>,
}

impl KindHierarchy {
    /// Creates an empty hierarchy where kinds only match themselves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `child` as a direct subkind of `parent`.
    ///
    /// Re-declaring an existing relation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Cycle`] when `parent` already matches `child`
    /// (including `child == parent`).
    pub fn declare(&mut self, child: Kind, parent: Kind) -> Result<(), HierarchyError> {
        if self.matches(parent, child) {
            return Err(HierarchyError::Cycle {
                child,
                parent,
            });
        }
        let parents = self.parents.entry(child).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
        Ok(())
    }

    /// Declares `C` as a direct subkind of `P`.
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Cycle`] when the relation would be cyclic.
    pub fn declare_subkind<C, P>(&mut self) -> Result<(), HierarchyError>
    where
        C: ?Sized + 'static,
        P: ?Sized + 'static,
    {
        self.declare(Kind::of::<C>(), Kind::of::<P>())
    }

    /// Builder form of [`KindHierarchy::declare_subkind`].
    ///
    /// # Errors
    ///
    /// Returns [`HierarchyError::Cycle`] when the relation would be cyclic.
    pub fn with_subkind<C, P>(mut self) -> Result<Self, HierarchyError>
    where
        C: ?Sized + 'static,
        P: ?Sized + 'static,
    {
        self.declare_subkind::<C, P>()?;
        Ok(self)
    }

    /// Returns the direct parents declared for `kind`.
    #[must_use]
    pub fn parents(&self, kind: Kind) -> &[Kind] {
        self.parents.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Returns every ancestor of `kind`, nearest first, without duplicates.
    #[must_use]
    pub fn ancestors(&self, kind: Kind) -> Vec<Kind> {
        let mut ordered = Vec::new();
        let mut seen = HashSet::from([kind]);
        let mut cursor = 0;
        ordered.extend(self.parents(kind).iter().copied().filter(|parent| seen.insert(*parent)));
        while let Some(current) = ordered.get(cursor).copied() {
            cursor += 1;
            for parent in self.parents(current) {
                if seen.insert(*parent) {
                    ordered.push(*parent);
                }
            }
        }
        ordered
    }

    /// Returns true when `actual` is `filter` or a declared descendant of it.
    #[must_use]
    pub fn matches(&self, actual: Kind, filter: Kind) -> bool {
        actual == filter || self.ancestors(actual).contains(&filter)
    }

    /// Returns true when no relation has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}
