//! # Document Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors.
///
/// Every variant is fatal for the request that hit it. Nothing here is
/// retried by the store layer.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    // Connection errors
    #[error("Invalid store URI: {0}")]
    InvalidUri(String),

    #[error("Unsupported store scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Store unreachable: {0}")]
    Unreachable(String),

    #[error("Store client is closed")]
    Closed,

    // Namespace errors
    #[error("Invalid namespace component: {0}")]
    InvalidNamespace(String),

    // Data errors
    #[error("Corrupt document at {location}: {reason}")]
    Corrupt { location: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    // Internal
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Whether the failure means the store could not be reached at all
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StoreError::Unreachable(_) | StoreError::Closed | StoreError::Io(_)
        )
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
