//! # Repository Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence mapper errors
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// No document for this id, or the id is not well-formed.
    /// The two cases are deliberately indistinguishable.
    #[error("Schema with id '{0}' not found")]
    NotFound(String),

    /// Stored document does not satisfy the output model
    #[error("Stored schema '{id}' is invalid: {reason}")]
    Corrupt { id: String, reason: String },

    /// Store failure, fatal for the current request
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = RepositoryError::NotFound("abc".into());
        assert_eq!(err.to_string(), "Schema with id 'abc' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_error_is_transparent() {
        let err = RepositoryError::from(StoreError::Closed);
        assert_eq!(err.to_string(), StoreError::Closed.to_string());
        assert!(!err.is_not_found());
    }
}
