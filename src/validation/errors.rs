//! Validation error types
//!
//! Error codes:
//! - DBMAKER_FIELD_REQUIRED
//! - DBMAKER_FIELD_NULL
//! - DBMAKER_TYPE_MISMATCH
//! - DBMAKER_INVALID_CHOICE
//!
//! Every validation error is a client fault. It is never retried and never
//! reaches the store.

use std::fmt;

/// Validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// Required field absent
    FieldRequired,
    /// Null given for a field that does not accept it
    FieldNull,
    /// Value of the wrong JSON type
    TypeMismatch,
    /// String outside the allowed literal set
    InvalidChoice,
}

impl ValidationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::FieldRequired => "DBMAKER_FIELD_REQUIRED",
            ValidationErrorCode::FieldNull => "DBMAKER_FIELD_NULL",
            ValidationErrorCode::TypeMismatch => "DBMAKER_TYPE_MISMATCH",
            ValidationErrorCode::InvalidChoice => "DBMAKER_INVALID_CHOICE",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failure details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field path (e.g., "tables[0].columns[1].type")
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// A structural violation in a schema payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    code: ValidationErrorCode,
    details: ValidationDetails,
}

impl ValidationError {
    /// Required field is missing
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            code: ValidationErrorCode::FieldRequired,
            details: ValidationDetails::new(field, "field to be present", "missing"),
        }
    }

    /// Field is null but does not accept null
    pub fn null_value(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            code: ValidationErrorCode::FieldNull,
            details: ValidationDetails::new(field, expected, "null"),
        }
    }

    /// Field has the wrong JSON type
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            code: ValidationErrorCode::TypeMismatch,
            details: ValidationDetails::new(field, expected, actual),
        }
    }

    /// Field is a string outside its literal set
    pub fn invalid_choice(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: &str,
    ) -> Self {
        Self {
            code: ValidationErrorCode::InvalidChoice,
            details: ValidationDetails::new(field, expected, format!("'{}'", actual)),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    /// Returns the offending field path
    pub fn field(&self) -> &str {
        &self.details.field
    }

    /// Returns the full details
    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.details)
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
