//!
//! Digmap: utilities for nested key-value mappings.
//! This library provides dotted-path access, deep-merge strategies, and
//! attribute-style views over nested string-keyed data.
//!
//! ## Core Concepts
//!
//! * **Values (`value::Value`)**: The closed union of everything a nested structure can hold: scalars, sequences (`list::List`), and mappings.
//! * **Maps (`map::Map`)**: The string-keyed mapping at the root of every structure, with builder methods and deterministic sorted rendering.
//! * **Dotted paths (`path`)**: `"a.b[1].c"`-style access with three traversal modes: strict (`Map::dig`), lenient and total (`Map::dig_get`), and writing with auto-created intermediates (`Map::dug`).
//! * **Merges (`merge`)**: Three deep-merge strategies sharing one mapping-collision rule but differing on sequences and ownership: `Map::union` (replace), `Map::union_setadd` (set-add), and `Map::union_copy` (copy-on-write).
//! * **Attribute views (`attr::AttrMap`)**: A wrapper that sanitizes keys to attribute-safe names, keeping a side-table so the original shape stays recoverable.
//! * **Projections (`project`)**: `export` and `original` walks that turn wrapper-bearing structures back into plain mappings.

pub mod attr;
pub mod errors;
pub mod list;
pub mod map;
pub mod merge;
pub mod path;
pub mod project;
pub mod value;

/// Re-export the main types for easier access.
pub use attr::AttrMap;
pub use errors::MapError;
pub use list::List;
pub use map::Map;
pub use value::Value;

/// Result type used throughout the digmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the digmap library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured mapping errors from the errors module
    #[error(transparent)]
    Map(errors::MapError),
}

impl Error {
    /// Check if this error indicates a failed path lookup.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Map(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is a type mismatch.
    pub fn is_type_mismatch(&self) -> bool {
        match self {
            Error::Map(err) => err.is_type_mismatch(),
            _ => false,
        }
    }

    /// Check if this error is a rejected wrapper key.
    pub fn is_reserved_key(&self) -> bool {
        match self {
            Error::Map(err) => err.is_reserved_key(),
            _ => false,
        }
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }
}
