//! Schema payload validation
//!
//! Turns an untrusted JSON payload into a typed [`SchemaDraft`] (create) or
//! [`SchemaPatch`] (update), or rejects it with the path of the offending
//! field.
//!
//! [`SchemaDraft`]: crate::model::SchemaDraft
//! [`SchemaPatch`]: crate::model::SchemaPatch

mod errors;
mod validator;

pub use errors::{ValidationDetails, ValidationError, ValidationErrorCode, ValidationResult};
pub use validator::SchemaValidator;
