//! # Store Error Types
//!
//! Errors raised while reading or writing the snapshot.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the snapshot key                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CliError (in the CLI) ← STORAGE_ERROR                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unknown ids are not errors here: mutators that miss simply do nothing.

use std::path::PathBuf;
use thiserror::Error;

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a snapshot file failed.
    ///
    /// ## When This Occurs
    /// - Data directory cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot key holds JSON that does not match the expected shape.
    #[error("Snapshot key '{key}' is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A collection could not be encoded.
    #[error("Failed to serialize snapshot key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// The snapshot key involved, when there is one.
    pub fn key(&self) -> Option<&str> {
        match self {
            StoreError::Io { .. } => None,
            StoreError::Corrupt { key, .. } | StoreError::Serialize { key, .. } => Some(key),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corrupt_names_key() {
        let source = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let err = StoreError::Corrupt {
            key: "products".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Snapshot key 'products' is corrupt"));
        assert_eq!(err.key(), Some("products"));
    }

    #[test]
    fn test_io_has_no_key() {
        let err = StoreError::io(
            "/nowhere/products.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.key().is_none());
        assert!(err.to_string().contains("/nowhere/products.json"));
    }
}
