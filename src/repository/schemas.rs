//! Schema repository
//!
//! Maps between validated schema values and stored documents:
//! - the store's native [`DocumentId`] under `_id` becomes the string `id`
//! - `created_at`, `updated_at`, `version` and `user_id` are stamped here
//! - every returned value is read back from the store and deserialized into
//!   the output model, so callers see exactly what was persisted

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::model::{Schema, SchemaDraft, SchemaPatch};
use crate::observability::{Event, Logger};
use crate::store::{Collection, Document, DocumentId, StoreError, Update, ID_FIELD};

use super::errors::{RepositoryError, RepositoryResult};

const INITIAL_VERSION: i64 = 1;

/// Persistence mapper for schema designs
#[derive(Debug, Clone)]
pub struct SchemaRepository {
    collection: Collection,
    bump_version: bool,
}

impl SchemaRepository {
    /// Create a repository over the given collection.
    ///
    /// `version` is left untouched by updates unless enabled with
    /// [`with_version_bump`](Self::with_version_bump).
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            bump_version: false,
        }
    }

    /// Increment `version` on every successful update
    pub fn with_version_bump(mut self, bump: bool) -> Self {
        self.bump_version = bump;
        self
    }

    /// Persist a new schema design.
    ///
    /// Assigns a fresh id, stamps both timestamps with the current time and
    /// `version = 1`, writes one document, then reads it back.
    pub async fn create(&self, draft: SchemaDraft) -> RepositoryResult<Schema> {
        let now = Utc::now();
        let mut document = to_document(&draft)?;
        document.insert("user_id".into(), Value::Null);
        document.insert("version".into(), Value::from(INITIAL_VERSION));
        document.insert("created_at".into(), to_value(now)?);
        document.insert("updated_at".into(), to_value(now)?);

        let id = self
            .collection
            .insert_one(DocumentId::generate(), document)
            .await?;

        let stored = self.collection.find_one(id).await?.ok_or_else(|| {
            StoreError::Internal(format!("document {} missing after insert", id))
        })?;

        let schema = from_document(stored)?;
        Logger::info(
            Event::SchemaCreated,
            &[("id", schema.id.as_str()), ("name", schema.name.as_str())],
        );
        Ok(schema)
    }

    /// Every stored schema, in the store's natural order
    pub async fn list(&self) -> RepositoryResult<Vec<Schema>> {
        self.collection
            .find()
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Fetch one schema by its external id
    pub async fn get(&self, id: &str) -> RepositoryResult<Schema> {
        let doc_id = parse_id(id)?;
        match self.collection.find_one(doc_id).await? {
            Some(document) => from_document(document),
            None => Err(RepositoryError::NotFound(id.to_string())),
        }
    }

    /// Apply a partial update.
    ///
    /// Only fields present in `patch` are replaced; a present collection
    /// replaces the stored collection wholesale. `updated_at` is always
    /// refreshed. Field replacement and the optional `version` increment
    /// happen in one store operation, so concurrent updates never lose an
    /// increment; replaced fields are last-write-wins.
    pub async fn update(&self, id: &str, patch: SchemaPatch) -> RepositoryResult<Schema> {
        let doc_id = parse_id(id)?;

        let mut fields = to_document(&patch)?;
        fields.insert("updated_at".into(), to_value(Utc::now())?);

        let mut update = Update::set(fields);
        if self.bump_version {
            update = update.inc("version", 1);
        }

        if !self.collection.update_one(doc_id, update).await? {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        let stored = self
            .collection
            .find_one(doc_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        let schema = from_document(stored)?;
        Logger::info(Event::SchemaUpdated, &[("id", schema.id.as_str())]);
        Ok(schema)
    }

    /// Remove a schema. Returns whether a document was removed; a malformed
    /// id removes nothing.
    pub async fn delete(&self, id: &str) -> RepositoryResult<bool> {
        let doc_id = match DocumentId::parse(id) {
            Some(doc_id) => doc_id,
            None => return Ok(false),
        };

        let deleted = self.collection.delete_one(doc_id).await?;
        if deleted {
            Logger::info(Event::SchemaDeleted, &[("id", id)]);
        }
        Ok(deleted)
    }
}

/// Malformed ids collapse into NotFound
fn parse_id(id: &str) -> RepositoryResult<DocumentId> {
    DocumentId::parse(id).ok_or_else(|| RepositoryError::NotFound(id.to_string()))
}

fn to_value<T: Serialize>(value: T) -> RepositoryResult<Value> {
    serde_json::to_value(value).map_err(|e| StoreError::from(e).into())
}

fn to_document<T: Serialize>(value: &T) -> RepositoryResult<Document> {
    match to_value(value)? {
        Value::Object(document) => Ok(document),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))
        .into()),
    }
}

/// Translate a stored document into the output model
fn from_document(mut document: Document) -> RepositoryResult<Schema> {
    let id = match document.remove(ID_FIELD) {
        Some(Value::String(id)) => id,
        other => {
            let reason = format!("'{}' is not a string id: {:?}", ID_FIELD, other);
            Logger::error(Event::SchemaCorrupt, &[("id", "?"), ("reason", reason.as_str())]);
            return Err(RepositoryError::Corrupt {
                id: "?".into(),
                reason,
            });
        }
    };

    document.insert("id".into(), Value::String(id.clone()));

    serde_json::from_value(Value::Object(document)).map_err(|e| {
        let reason = e.to_string();
        Logger::error(
            Event::SchemaCorrupt,
            &[("id", id.as_str()), ("reason", reason.as_str())],
        );
        RepositoryError::Corrupt { id, reason }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnType, Position, Table};
    use crate::store::StoreClient;
    use serde_json::json;

    async fn repository() -> SchemaRepository {
        let client = StoreClient::connect("memory://").await.unwrap();
        SchemaRepository::new(client.collection("test", "schemas").unwrap())
    }

    fn draft() -> SchemaDraft {
        let mut draft = SchemaDraft::named("Blog");
        draft.tables.push(Table {
            id: "t1".into(),
            name: "posts".into(),
            position: Position { x: 0.0, y: 0.0 },
            color: "#3B82F6".into(),
            columns: vec![Column::new("c1", "id", ColumnType::Integer)],
            comment: None,
        });
        draft
    }

    #[tokio::test]
    async fn test_create_stamps_metadata() {
        let repo = repository().await;
        let schema = repo.create(draft()).await.unwrap();

        assert!(DocumentId::is_well_formed(&schema.id));
        assert_eq!(schema.version, 1);
        assert_eq!(schema.user_id, None);
        assert_eq!(schema.created_at, schema.updated_at);
        assert_eq!(schema.name, "Blog");
        assert_eq!(schema.tables.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let repo = repository().await;
        let err = repo.get("nope").await.unwrap_err();
        assert!(err.is_not_found());

        let err = repo
            .update("nope", SchemaPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        assert!(!repo.delete("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repository().await;
        let id = DocumentId::generate().to_external();
        let patch = SchemaPatch {
            name: Some("X".into()),
            ..Default::default()
        };
        assert!(repo.update(&id, patch).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_version_bump_opt_in() {
        let repo = repository().await.with_version_bump(true);
        let created = repo.create(draft()).await.unwrap();

        let patch = SchemaPatch {
            is_public: Some(true),
            ..Default::default()
        };
        let updated = repo.update(&created.id, patch.clone()).await.unwrap();
        assert_eq!(updated.version, 2);

        let updated = repo.update(&created.id, patch).await.unwrap();
        assert_eq!(updated.version, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_version_bumps_are_not_lost() {
        let repo = repository().await.with_version_bump(true);
        let created = repo.create(draft()).await.unwrap();

        let mut tasks = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            let id = created.id.clone();
            tasks.push(tokio::spawn(async move {
                let patch = SchemaPatch {
                    name: Some(format!("Blog {}", i)),
                    ..Default::default()
                };
                repo.update(&id, patch).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(repo.get(&created.id).await.unwrap().version, 17);
    }

    #[tokio::test]
    async fn test_version_unchanged_by_default() {
        let repo = repository().await;
        let created = repo.create(draft()).await.unwrap();

        let patch = SchemaPatch {
            is_public: Some(true),
            ..Default::default()
        };
        let updated = repo.update(&created.id, patch).await.unwrap();
        assert_eq!(updated.version, 1);
        assert!(updated.is_public);
    }

    #[test]
    fn test_from_document_maps_id() {
        let document = json!({
            "_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": "S",
            "version": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
        .as_object()
        .cloned()
        .unwrap();

        let schema = from_document(document).unwrap();
        assert_eq!(schema.id, "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!(schema.tables.is_empty());
        assert!(!schema.is_public);
    }

    #[test]
    fn test_from_document_rejects_invalid_shape() {
        let document = json!({
            "_id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": null,
            "version": 1,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
        .as_object()
        .cloned()
        .unwrap();

        let err = from_document(document).unwrap_err();
        assert!(matches!(err, RepositoryError::Corrupt { .. }));
    }
}
