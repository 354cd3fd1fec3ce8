//! # API Errors
//!
//! Maps validation, lookup and store failures onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::{Event, Logger};
use crate::repository::RepositoryError;
use crate::validation::ValidationError;

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced at the HTTP boundary
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Payload failed schema validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Body is not parseable JSON
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// Unknown or malformed schema id
    #[error("Schema with id '{0}' not found")]
    NotFound(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Store or mapping failure. The detail is logged, never returned.
    #[error("Internal server error")]
    Internal(String),

    /// Store could not be reached. Same response as `Internal`, logged apart.
    #[error("Internal server error")]
    StoreUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MalformedBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::StoreUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn field(&self) -> Option<String> {
        match self {
            ApiError::Validation(err) => Some(err.field().to_string()),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            ApiError::Validation(err) => {
                Logger::warn(
                    Event::SchemaRejected,
                    &[("code", err.code().code()), ("field", err.field())],
                );
            }
            ApiError::MalformedBody(reason) => {
                Logger::warn(Event::SchemaRejected, &[("reason", reason.as_str())]);
            }
            ApiError::Internal(reason) => {
                Logger::error(Event::StoreError, &[("reason", reason.as_str())]);
            }
            ApiError::StoreUnavailable(reason) => {
                Logger::error(Event::StoreUnreachable, &[("reason", reason.as_str())]);
            }
            ApiError::NotFound(_) => {}
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ApiError::NotFound(id),
            RepositoryError::Store(err) if err.is_connectivity() => {
                ApiError::StoreUnavailable(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
            code: err.status_code().as_u16(),
            field: err.field(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
