//! # In-Memory Backend
//!
//! Process-local engine. Contents live as long as the process.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::backend::{
    apply_update, Document, DocumentStore, Namespace, StoreFuture, Update, ID_FIELD,
};
use super::errors::{StoreError, StoreResult};
use super::id::DocumentId;

type Collections = HashMap<Namespace, HashMap<DocumentId, Document>>;

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> StoreResult<T> {
        let data = self
            .data
            .read()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(f(&data))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Collections) -> T) -> StoreResult<T> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        Ok(f(&mut data))
    }
}

impl DocumentStore for MemoryStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move { self.read(|_| ()) })
    }

    fn insert<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
        mut document: Document,
    ) -> StoreFuture<'a, DocumentId> {
        Box::pin(async move {
            document.insert(ID_FIELD.to_string(), Value::String(id.to_external()));
            self.write(|data| {
                data.entry(ns.clone()).or_default().insert(id, document);
            })?;
            Ok(id)
        })
    }

    fn find<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
    ) -> StoreFuture<'a, Option<Document>> {
        Box::pin(async move { self.read(|data| data.get(ns).and_then(|c| c.get(&id)).cloned()) })
    }

    fn find_all<'a>(&'a self, ns: &'a Namespace) -> StoreFuture<'a, Vec<Document>> {
        Box::pin(async move {
            self.read(|data| {
                data.get(ns)
                    .map(|c| c.values().cloned().collect())
                    .unwrap_or_default()
            })
        })
    }

    fn update<'a>(
        &'a self,
        ns: &'a Namespace,
        id: DocumentId,
        update: Update,
    ) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            self.write(|data| match data.get_mut(ns).and_then(|c| c.get_mut(&id)) {
                Some(doc) => apply_update(doc, update).map(|()| true),
                None => Ok(false),
            })?
        })
    }

    fn delete<'a>(&'a self, ns: &'a Namespace, id: DocumentId) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            self.write(|data| {
                data.get_mut(ns)
                    .map(|c| c.remove(&id).is_some())
                    .unwrap_or(false)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ns() -> Namespace {
        Namespace::new("test", "schemas").unwrap()
    }

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_find() {
        let store = MemoryStore::new();
        let ns = ns();
        let id = DocumentId::generate();

        store.insert(&ns, id, doc(json!({"name": "a"}))).await.unwrap();

        let found = store.find(&ns, id).await.unwrap().unwrap();
        assert_eq!(found["name"], "a");
        assert_eq!(found[ID_FIELD], id.to_external());
    }

    #[tokio::test]
    async fn test_find_missing() {
        let store = MemoryStore::new();
        let found = store.find(&ns(), DocumentId::generate()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let store = MemoryStore::new();
        let a = Namespace::new("db", "a").unwrap();
        let b = Namespace::new("db", "b").unwrap();
        let id = DocumentId::generate();

        store.insert(&a, id, doc(json!({}))).await.unwrap();

        assert!(store.find(&b, id).await.unwrap().is_none());
        assert_eq!(store.find_all(&a).await.unwrap().len(), 1);
        assert!(store.find_all(&b).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let ns = ns();
        let id = DocumentId::generate();

        store
            .insert(&ns, id, doc(json!({"name": "a", "n": 1})))
            .await
            .unwrap();

        let matched = store
            .update(&ns, id, Update::set(doc(json!({"name": "b"}))).inc("n", 1))
            .await
            .unwrap();
        assert!(matched);

        let found = store.find(&ns, id).await.unwrap().unwrap();
        assert_eq!(found["name"], "b");
        assert_eq!(found["n"], 2);

        assert!(store.delete(&ns, id).await.unwrap());
        assert!(!store.delete(&ns, id).await.unwrap());
        assert!(!store
            .update(&ns, id, Update::set(doc(json!({"name": "c"}))))
            .await
            .unwrap());
    }
}
