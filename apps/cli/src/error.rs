//! # CLI Error Type
//!
//! What the operator sees when a command fails.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in stockbook                             │
//! │                                                                         │
//! │  stockbook sale add --item RAM-16-DDR4:0                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command handler  →  CliResult<T>                                │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad input? ─────── ValidationError ───────────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Snapshot I/O? ──── StoreError ──────────────── CliError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ─────────── JSON on stdout                              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: {"code": "VALIDATION_ERROR", "message": "quantity must ..."}  │
//! │  exit status 1                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::fmt;
use std::path::Path;
use stockbook_core::{CoreError, ValidationError};
use stockbook_store::StoreError;

/// Error printed by the `stockbook` binary.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Shopkeeper not found: 5b0e..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before reaching the store
    ValidationError,

    /// Unknown id or code
    NotFound,

    /// Snapshot could not be read or written
    StorageError,

    /// Config file missing, malformed or invalid
    ConfigError,

    /// Bad credentials, or no one is logged in
    Unauthorized,

    /// Anything else (e.g. output encoding)
    Internal,
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    /// Config file I/O failure at `path`.
    pub fn config_io(path: &Path, err: std::io::Error) -> Self {
        CliError::config(format!("{}: {}", path.display(), err))
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => inner.into(),
            CoreError::InvalidDateRange { .. } => CliError::validation(err.to_string()),
        }
    }
}

/// Snapshot failures keep their detail: the operator usually has to fix
/// the file by hand.
impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        tracing::error!(key = ?err.key(), "Snapshot failure: {}", err);
        CliError::new(ErrorCode::StorageError, err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::config(format!("Invalid config file: {err}"))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        CliError::config(format!("Could not encode config: {err}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Output encoding failed: {}", err);
        CliError::internal("Could not encode output")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_validation_maps_to_validation_code() {
        let err: CliError = ValidationError::MustBePositive {
            field: "amount".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "amount must be positive");
    }

    #[test]
    fn test_bad_range_is_validation() {
        let err: CliError = CoreError::InvalidDateRange {
            start: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = CliError::not_found("Product", "KB-K120");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: KB-K120");
    }

    #[test]
    fn test_display() {
        let err = CliError::unauthorized("Not logged in");
        assert_eq!(err.to_string(), "[Unauthorized] Not logged in");
    }
}
