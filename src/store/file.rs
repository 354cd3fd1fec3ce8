//! # File-Backed Backend
//!
//! Durable engine. Layout:
//!
//! ```text
//! <root>/<database>/<collection>/<id>.json
//! ```
//!
//! Writes go to a uniquely named `<id>.json.<nonce>.tmp` first and are
//! renamed into place, so a crash mid-write never leaves a half-written
//! document under its final name.
//!
//! Mutations hold the store's write lock for the whole read-modify-write,
//! and reads hold the read lock, mirroring [`MemoryStore`](super::MemoryStore).
//! This serializes writers within one process only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tokio::sync::RwLock;

use super::backend::{
    apply_update, Document, DocumentStore, Namespace, StoreFuture, Update, ID_FIELD,
};
use super::errors::{StoreError, StoreResult};
use super::id::DocumentId;

const EXTENSION: &str = "json";

/// Local filesystem storage backend
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    lock: RwLock<()>,
}

impl FileStore {
    /// Create a backend rooted at `root`. Nothing is touched on disk until
    /// the first operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: RwLock::new(()),
        }
    }

    fn collection_dir(&self, ns: &Namespace) -> PathBuf {
        self.root.join(ns.database()).join(ns.collection())
    }

    fn document_path(&self, ns: &Namespace, id: DocumentId) -> PathBuf {
        self.collection_dir(ns)
            .join(format!("{}.{}", id.to_external(), EXTENSION))
    }

    async fn read_document(path: &Path) -> StoreResult<Option<Document>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::from(e)),
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(doc)) => Ok(Some(doc)),
            Ok(_) => Err(StoreError::Corrupt {
                location: path.display().to_string(),
                reason: "document is not a JSON object".into(),
            }),
            Err(e) => Err(StoreError::Corrupt {
                location: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn write_document(path: &Path, document: &Document) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_vec_pretty(document)?;
        let tmp = path.with_extension(format!("{}.{}.tmp", EXTENSION, DocumentId::generate()));
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            fs::create_dir_all(&self.root).await.map_err(|e| {
                StoreError::Unreachable(format!("{}: {}", self.root.display(), e))
            })?;
            let meta = fs::metadata(&self.root).await.map_err(|e| {
                StoreError::Unreachable(format!("{}: {}", self.root.display(), e))
            })?;
            if !meta.is_dir() {
                return Err(StoreError::Unreachable(format!(
                    "{} is not a directory",
                    self.root.display()
                )));
            }
            Ok(())
        })
    }

    fn insert<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
        mut document: Document,
    ) -> StoreFuture<'a, DocumentId> {
        Box::pin(async move {
            document.insert(ID_FIELD.to_string(), Value::String(id.to_external()));
            let _guard = self.lock.write().await;
            Self::write_document(&self.document_path(ns, id), &document).await?;
            Ok(id)
        })
    }

    fn find<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
    ) -> StoreFuture<'a, Option<Document>> {
        Box::pin(async move {
            let _guard = self.lock.read().await;
            Self::read_document(&self.document_path(ns, id)).await
        })
    }

    fn find_all<'a>(&'a self, ns: &'a Namespace) -> StoreFuture<'a, Vec<Document>> {
        Box::pin(async move {
            let dir = self.collection_dir(ns);
            let _guard = self.lock.read().await;
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(StoreError::from(e)),
            };

            let mut documents = Vec::new();
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().map_or(true, |ext| ext != EXTENSION) {
                    continue;
                }
                if let Some(doc) = Self::read_document(&path).await? {
                    documents.push(doc);
                }
            }
            Ok(documents)
        })
    }

    fn update<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
        update: Update,
    ) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let path = self.document_path(ns, id);
            let _guard = self.lock.write().await;
            let mut document = match Self::read_document(&path).await? {
                Some(doc) => doc,
                None => return Ok(false),
            };
            apply_update(&mut document, update)?;
            Self::write_document(&path, &document).await?;
            Ok(true)
        })
    }

    fn delete<'a>(&'a self, ns: &'a Namespace, id: DocumentId) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let _guard = self.lock.write().await;
            match fs::remove_file(self.document_path(ns, id)).await {
                Ok(()) => Ok(true),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
                Err(e) => Err(StoreError::from(e)),
            }
        })
    }
}
