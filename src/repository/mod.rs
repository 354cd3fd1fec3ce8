//! # Schema Persistence
//!
//! Translates between validated schema values and stored documents, owning
//! identifier translation and lifecycle-metadata stamping.

mod errors;
mod schemas;

pub use errors::{RepositoryError, RepositoryResult};
pub use schemas::SchemaRepository;
