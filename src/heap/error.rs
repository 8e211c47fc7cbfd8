//! Heap error types

use thiserror::Error;

/// Errors that can occur during heap operations
///
/// Every failing operation is rejected before it touches the heap, so the
/// heap is always left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError<K> {
    #[error("Heap is empty")]
    EmptyCollection,

    #[error("Unknown identifier: {0:?}")]
    UnknownIdentifier(K),

    #[error("Identifier already present: {0:?}")]
    DuplicateIdentifier(K),
}

impl<K> HeapError<K> {
    /// Check if this is an empty-heap error
    pub fn is_empty_collection(&self) -> bool {
        matches!(self, HeapError::EmptyCollection)
    }

    /// Get the identifier the failing operation referred to, if any
    pub fn identifier(&self) -> Option<&K> {
        match self {
            HeapError::EmptyCollection => None,
            HeapError::UnknownIdentifier(id) | HeapError::DuplicateIdentifier(id) => Some(id),
        }
    }
}
