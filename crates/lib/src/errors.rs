//! Error types for nested-mapping operations.
//!
//! This module defines the structured errors raised by path resolution, merging,
//! and attribute-view wrapping. Every failure is synchronous and reflects a
//! caller contract violation (malformed path, malformed key, or type-inconsistent
//! merge operands); there is no retry or recovery layer.

use thiserror::Error;

/// Structured error types for nested-mapping operations.
///
/// Path-lookup variants carry the full dotted path alongside the offending
/// step so callers can report exactly where a traversal failed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MapError {
    /// A strict path lookup did not find a key in a mapping
    #[error("key '{key}' not found while resolving '{path}'")]
    KeyNotFound { path: String, key: String },

    /// A path step indexed past the end of a sequence
    #[error("index {index} out of bounds (len {len}) while resolving '{path}'")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// A path step tried to descend into a value that cannot be indexed
    #[error("cannot resolve step '{segment}' in a {kind} value while resolving '{path}'")]
    NotIndexable {
        path: String,
        segment: String,
        kind: String,
    },

    /// A typed extraction found a value of a different kind
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Set-add merge found a non-sequence in the target where the source holds a sequence
    #[error("target value for key '{key}' is a {actual}, not a sequence, where the source value is")]
    SequenceMismatch { key: String, actual: String },

    /// A wrapper construction key begins with the reserved internal prefix
    #[error("key may not begin with the reserved prefix: '{key}'")]
    ReservedPrefix { key: String },

    /// A wrapper construction key sanitizes to a reserved word
    #[error("key '{key}' conflicts with reserved word '{word}'")]
    ReservedWord { key: String, word: String },
}

impl MapError {
    /// Check if this error is a failed path lookup (missing key or index)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            MapError::KeyNotFound { .. } | MapError::IndexOutOfBounds { .. }
        )
    }

    /// Check if this error comes from indexing a non-indexable value
    pub fn is_not_indexable(&self) -> bool {
        matches!(self, MapError::NotIndexable { .. })
    }

    /// Check if this error is a type mismatch (extraction or merge)
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            MapError::TypeMismatch { .. } | MapError::SequenceMismatch { .. }
        )
    }

    /// Check if this error is a wrapper key-validation failure
    pub fn is_reserved_key(&self) -> bool {
        matches!(
            self,
            MapError::ReservedPrefix { .. } | MapError::ReservedWord { .. }
        )
    }

    /// Get the dotted path if this is a path-lookup error
    pub fn path(&self) -> Option<&str> {
        match self {
            MapError::KeyNotFound { path, .. }
            | MapError::IndexOutOfBounds { path, .. }
            | MapError::NotIndexable { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Get the rejected key if this is a key-validation or merge error
    pub fn key(&self) -> Option<&str> {
        match self {
            MapError::KeyNotFound { key, .. }
            | MapError::SequenceMismatch { key, .. }
            | MapError::ReservedPrefix { key }
            | MapError::ReservedWord { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl From<MapError> for crate::Error {
    fn from(err: MapError) -> Self {
        crate::Error::Map(err)
    }
}
