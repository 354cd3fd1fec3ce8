//! # Document Store Backend Trait
//!
//! A backend stores self-contained JSON documents grouped into namespaces
//! (`database.collection`). Every stored document carries its identifier
//! under the [`ID_FIELD`] key in string form.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};
use super::id::DocumentId;

/// Key under which a stored document carries its identifier
pub const ID_FIELD: &str = "_id";

/// A stored document: one JSON object
pub type Document = Map<String, Value>;

/// Boxed future returned by backend operations
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Database + collection pair addressing a group of documents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    /// Create a namespace.
    ///
    /// Components must be non-empty and limited to ASCII alphanumerics,
    /// `_` and `-`, since file-backed engines map them onto directories.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> StoreResult<Self> {
        let database = database.into();
        let collection = collection.into();
        check_component(&database)?;
        check_component(&collection)?;
        Ok(Self {
            database,
            collection,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

fn check_component(name: &str) -> StoreResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidNamespace(name.to_string()))
    }
}

/// Backend trait for document storage.
///
/// Each call is one independent store round trip. No call spans more than
/// one document atomically.
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Check that the backend is reachable
    fn ping(&self) -> StoreFuture<'_, ()>;

    /// Store a new document under `id`. Any `_id` already in the document
    /// is overwritten.
    fn insert<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
        document: Document,
    ) -> StoreFuture<'a, DocumentId>;

    /// Fetch one document
    fn find<'a>(&'a self, ns: &'a Namespace, id: DocumentId)
        -> StoreFuture<'a, Option<Document>>;

    /// Fetch every document, in the backend's natural order
    fn find_all<'a>(&'a self, ns: &'a Namespace) -> StoreFuture<'a, Vec<Document>>;

    /// Apply `update` to one document as a single operation.
    ///
    /// Returns whether a document matched `id`.
    fn update<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
        update: Update,
    ) -> StoreFuture<'a, bool>;

    /// Remove one document. Returns whether a document was removed.
    fn delete<'a>(&'a self, ns: &'a Namespace, id: DocumentId) -> StoreFuture<'a, bool>;
}

/// Field-level changes to one document, in the manner of `$set` + `$inc`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    /// Top-level fields replaced wholesale
    pub set: Document,
    /// Integer fields incremented in place; a missing field starts at 0
    pub inc: Vec<(String, i64)>,
}

impl Update {
    pub fn set(fields: Document) -> Self {
        Self {
            set: fields,
            inc: Vec::new(),
        }
    }

    pub fn inc(mut self, field: impl Into<String>, by: i64) -> Self {
        self.inc.push((field.into(), by));
        self
    }
}

/// Apply an [`Update`] to a document.
///
/// `_id` is never overwritten. Increments are checked before anything is
/// written, so a failed update leaves the document untouched.
pub(crate) fn apply_update(document: &mut Document, update: Update) -> StoreResult<()> {
    let mut increments = Vec::with_capacity(update.inc.len());
    for (field, by) in update.inc {
        let current = match update.set.get(&field).or_else(|| document.get(&field)) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_i64().ok_or_else(|| {
                StoreError::Serialization(format!(
                    "cannot increment non-integer field '{}'",
                    field
                ))
            })?,
        };
        let next = current.checked_add(by).ok_or_else(|| {
            StoreError::Serialization(format!("increment of '{}' overflows", field))
        })?;
        increments.push((field, next));
    }

    for (key, value) in update.set {
        if key == ID_FIELD {
            continue;
        }
        document.insert(key, value);
    }
    for (field, next) in increments {
        if field != ID_FIELD {
            document.insert(field, Value::from(next));
        }
    }
    Ok(())
}
