//! Schema HTTP Routes
//!
//! CRUD endpoints for schema designs, nested under the configured API prefix.
//! Every payload is validated before the store is touched.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::model::Schema;
use crate::repository::SchemaRepository;
use crate::validation::SchemaValidator;

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// Schema state shared across handlers
#[derive(Debug, Clone)]
pub struct SchemaState {
    pub repository: SchemaRepository,
}

impl SchemaState {
    pub fn new(repository: SchemaRepository) -> Self {
        Self { repository }
    }
}

// ==================
// Routes
// ==================

/// Create schema routes
pub fn schema_routes(state: Arc<SchemaState>) -> Router {
    Router::new()
        .route("/schemas", get(list_schemas).post(create_schema))
        .route("/schemas/", get(list_schemas).post(create_schema))
        .route(
            "/schemas/{id}",
            get(get_schema).put(update_schema).delete(delete_schema),
        )
        .with_state(state)
}

/// Unwrap a JSON body, reporting unparseable input as a client error
fn body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
}

// ==================
// Handlers
// ==================

async fn create_schema(
    State(state): State<Arc<SchemaState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Schema>)> {
    let draft = SchemaValidator::validate_create(&body(payload)?)?;
    let schema = state.repository.create(draft).await?;
    Ok((StatusCode::CREATED, Json(schema)))
}

async fn list_schemas(State(state): State<Arc<SchemaState>>) -> ApiResult<Json<Vec<Schema>>> {
    Ok(Json(state.repository.list().await?))
}

async fn get_schema(
    State(state): State<Arc<SchemaState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Schema>> {
    Ok(Json(state.repository.get(&id).await?))
}

async fn update_schema(
    State(state): State<Arc<SchemaState>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Schema>> {
    let patch = SchemaValidator::validate_update(&body(payload)?)?;
    Ok(Json(state.repository.update(&id, patch).await?))
}

async fn delete_schema(
    State(state): State<Arc<SchemaState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.repository.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}
