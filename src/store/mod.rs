//! # Document Store
//!
//! Persistence engine for schema designs. Each design is stored as one
//! self-contained JSON document; nothing is normalized across documents.
//!
//! Engines are selected by connection string:
//! - `memory://` - [`MemoryStore`]
//! - `file://<dir>` - [`FileStore`]

mod backend;
mod client;
mod errors;
mod file;
mod id;
mod memory;

pub use backend::{Document, DocumentStore, Namespace, StoreFuture, Update, ID_FIELD};
pub use client::{Collection, StoreClient, StoreUri};
pub use errors::{StoreError, StoreResult};
pub use file::FileStore;
pub use id::DocumentId;
pub use memory::MemoryStore;
