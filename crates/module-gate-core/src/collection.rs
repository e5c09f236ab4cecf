// crates/module-gate-core/src/collection.rs
// ============================================================================
// Module: Read-Only Collections
// Description: Collection views exposed by module descriptors.
// Purpose: Give descriptor fields a uniform, probe-able read-only surface.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Descriptor fields are surfaced as [`CollectionView`] trait objects so that
//! descriptors supplied by external sources can be read and probed without
//! knowing their concrete storage. The crate ships two conformant
//! implementations, [`FrozenSet`] and [`FrozenList`], whose
//! [`CollectionView::try_insert`] always fails with
//! [`MutationError::Unsupported`].
//!
//! ## Invariants
//! - Conformant views never change after construction.
//! - Iteration order of [`FrozenSet`] is the element ordering; [`FrozenList`]
//!   preserves insertion order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Outcome of a rejected mutation attempt on a collection view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// The collection is read-only and refuses all mutation.
    #[error("unsupported mutation")]
    Unsupported,
    /// The mutation failed for a reason other than read-only enforcement.
    #[error("mutation failed: {0}")]
    Failed(String),
}

// ============================================================================
// SECTION: Collection View
// ============================================================================

/// Read-only view over a collection-valued descriptor field.
pub trait CollectionView<T> {
    /// Returns the number of elements.
    fn len(&self) -> usize;

    /// Returns true when the collection holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the elements in the collection's stable order.
    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_>;

    /// Attempts to insert a single element.
    ///
    /// # Errors
    ///
    /// Conformant read-only collections return [`MutationError::Unsupported`].
    fn try_insert(&self, value: T) -> Result<(), MutationError>;
}

// ============================================================================
// SECTION: Frozen Set
// ============================================================================

/// Ordered, deduplicated, read-only set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrozenSet<T: Ord>(BTreeSet<T>);

impl<T: Ord> FrozenSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates elements in ascending order.
    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, T> {
        self.0.iter()
    }
}

impl<T: Ord> Default for FrozenSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Ord> FromIterator<T> for FrozenSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Ord> CollectionView<T> for FrozenSet<T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.0.iter())
    }

    fn try_insert(&self, _value: T) -> Result<(), MutationError> {
        Err(MutationError::Unsupported)
    }
}

// ============================================================================
// SECTION: Frozen List
// ============================================================================

/// Ordered, read-only sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrozenList<T>(Vec<T>);

impl<T> FrozenList<T> {
    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T> Default for FrozenList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> FromIterator<T> for FrozenList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> CollectionView<T> for FrozenList<T> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.0.iter())
    }

    fn try_insert(&self, _value: T) -> Result<(), MutationError> {
        Err(MutationError::Unsupported)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
