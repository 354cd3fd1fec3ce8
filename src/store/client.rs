//! # Store Client
//!
//! Process-wide connection handle. Opened once at startup with
//! [`StoreClient::connect`], shared by `Arc` across every request, and
//! closed once at shutdown with [`StoreClient::close`]. After close, every
//! operation fails with [`StoreError::Closed`].

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::backend::{Document, DocumentStore, Namespace, Update};
use super::errors::{StoreError, StoreResult};
use super::file::FileStore;
use super::id::DocumentId;
use super::memory::MemoryStore;

/// Parsed store connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreUri {
    /// `memory://` - process-local, lost on exit
    Memory,
    /// `file://<dir>` - one JSON file per document under `<dir>`
    File(PathBuf),
}

impl StoreUri {
    pub fn parse(uri: &str) -> StoreResult<Self> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| StoreError::InvalidUri(format!("missing scheme in '{}'", uri)))?;

        match scheme {
            "memory" => Ok(StoreUri::Memory),
            "file" => {
                if rest.is_empty() {
                    return Err(StoreError::InvalidUri(format!(
                        "missing path in '{}'",
                        uri
                    )));
                }
                Ok(StoreUri::File(PathBuf::from(rest)))
            }
            other => Err(StoreError::UnsupportedScheme(other.to_string())),
        }
    }

    fn open(&self) -> Arc<dyn DocumentStore> {
        match self {
            StoreUri::Memory => Arc::new(MemoryStore::new()),
            StoreUri::File(root) => Arc::new(FileStore::new(root.clone())),
        }
    }
}

/// Connection handle to a document store
#[derive(Debug)]
pub struct StoreClient {
    backend: Arc<dyn DocumentStore>,
    closed: AtomicBool,
}

impl StoreClient {
    /// Open the store named by `uri` and verify it is reachable
    pub async fn connect(uri: &str) -> StoreResult<Arc<Self>> {
        let backend = StoreUri::parse(uri)?.open();
        backend.ping().await?;
        Ok(Arc::new(Self::with_backend(backend)))
    }

    /// Wrap an already-open backend
    pub fn with_backend(backend: Arc<dyn DocumentStore>) -> Self {
        Self {
            backend,
            closed: AtomicBool::new(false),
        }
    }

    /// Handle on one collection of one database
    pub fn collection(
        self: &Arc<Self>,
        database: &str,
        collection: &str,
    ) -> StoreResult<Collection> {
        Ok(Collection {
            client: Arc::clone(self),
            ns: Namespace::new(database, collection)?,
        })
    }

    /// Release the connection. Idempotent.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Check reachability
    pub async fn ping(&self) -> StoreResult<()> {
        self.backend()?.ping().await
    }

    fn backend(&self) -> StoreResult<&dyn DocumentStore> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(self.backend.as_ref())
    }
}

/// Handle on one collection
#[derive(Debug, Clone)]
pub struct Collection {
    client: Arc<StoreClient>,
    ns: Namespace,
}

impl Collection {
    pub async fn insert_one(&self, id: DocumentId, document: Document) -> StoreResult<DocumentId> {
        self.client.backend()?.insert(&self.ns, id, document).await
    }

    pub async fn find_one(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        self.client.backend()?.find(&self.ns, id).await
    }

    pub async fn find(&self) -> StoreResult<Vec<Document>> {
        self.client.backend()?.find_all(&self.ns).await
    }

    /// Apply `update` atomically. Returns whether a document matched.
    pub async fn update_one(&self, id: DocumentId, update: Update) -> StoreResult<bool> {
        self.client.backend()?.update(&self.ns, id, update).await
    }

    pub async fn delete_one(&self, id: DocumentId) -> StoreResult<bool> {
        self.client.backend()?.delete(&self.ns, id).await
    }
}
