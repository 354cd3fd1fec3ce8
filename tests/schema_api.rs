//! HTTP end-to-end tests for the schema API
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`,
//! over an in-memory store.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use dbmaker::config::AppConfig;
use dbmaker::http_server::HttpServer;
use dbmaker::store::StoreClient;

// =============================================================================
// Helpers
// =============================================================================

async fn app_with(config: AppConfig) -> Router {
    let client = StoreClient::connect(&config.store_uri).await.unwrap();
    HttpServer::new(config, client).unwrap().router()
}

async fn app() -> Router {
    app_with(AppConfig {
        store_uri: "memory://".into(),
        ..Default::default()
    })
    .await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn blog_payload() -> Value {
    json!({
        "name": "Blog",
        "tables": [{
            "id": "t1",
            "name": "posts",
            "position": {"x": 0, "y": 0},
            "columns": [
                {"id": "c1", "name": "id", "type": "integer", "primary_key": true},
                {"id": "c2", "name": "title", "type": "varchar", "length": 255}
            ]
        }]
    })
}

// =============================================================================
// Blog scenario
// =============================================================================

#[tokio::test]
async fn test_blog_lifecycle() {
    let app = app().await;

    let (status, created) = send(&app, Method::POST, "/api/v1/schemas", Some(blog_payload())).await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 36);
    assert_eq!(created["version"], 1);
    assert_eq!(created["is_public"], false);
    assert_eq!(created["description"], Value::Null);
    assert_eq!(created["relationships"], json!([]));
    assert_eq!(created["indexes"], json!([]));
    assert!(created["created_at"].is_string());
    assert_eq!(created["created_at"], created["updated_at"]);

    let tables = created["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table["color"], "#3B82F6");
    let columns = table["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 2);

    let column = &columns[0];
    assert_eq!(column["type"], "integer");
    assert_eq!(column["primary_key"], true);
    assert_eq!(column["nullable"], true);
    assert_eq!(column["unique"], false);
    assert_eq!(column["auto_increment"], false);
    assert_eq!(column["index"], false);

    let title = &columns[1];
    assert_eq!(title["name"], "title");
    assert_eq!(title["type"], "varchar");
    assert_eq!(title["length"], 255);
    assert_eq!(title["nullable"], true);

    let (status, listed) = send(&app, Method::GET, "/api/v1/schemas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created.clone()]));

    let uri = format!("/api/v1/schemas/{}", id);
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, listed) = send(&app, Method::GET, "/api/v1/schemas", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update() {
    let app = app().await;
    let (_, created) = send(&app, Method::POST, "/api/v1/schemas", Some(blog_payload())).await;
    let uri = format!("/api/v1/schemas/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "Blog v2", "is_public": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Blog v2");
    assert_eq!(updated["is_public"], true);
    assert_eq!(updated["tables"], created["tables"]);
    assert_eq!(updated["version"], 1);
    assert_eq!(updated["created_at"], created["created_at"]);
}

// =============================================================================
// Error responses
// =============================================================================

#[tokio::test]
async fn test_unknown_and_malformed_ids_are_404() {
    let app = app().await;

    let missing = "/api/v1/schemas/67e55044-10b1-426f-9247-bb680e5fe0c8";
    let malformed = "/api/v1/schemas/not-an-id";

    for uri in [missing, malformed] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);

        let (status, _) = send(&app, Method::PUT, uri, Some(json!({"name": "X"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, body) = send(&app, Method::GET, malformed, None).await;
    assert_eq!(body["error"], "Schema with id 'not-an-id' not found");
}

#[tokio::test]
async fn test_invalid_column_type_is_422() {
    let app = app().await;
    let mut payload = blog_payload();
    payload["tables"][0]["columns"][0]["type"] = json!("money");

    let (status, body) = send(&app, Method::POST, "/api/v1/schemas", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
    assert_eq!(body["field"], "tables[0].columns[0].type");

    let (_, listed) = send(&app, Method::GET, "/api/v1/schemas", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_missing_name_is_422() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/api/v1/schemas", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn test_invalid_update_is_422_before_lookup() {
    let app = app().await;
    let uri = "/api/v1/schemas/67e55044-10b1-426f-9247-bb680e5fe0c8";
    let (status, body) = send(&app, Method::PUT, uri, Some(json!({"name": null}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "name");
}

#[tokio::test]
async fn test_malformed_json_is_422() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/schemas")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], 422);
}

#[tokio::test]
async fn test_non_object_root_is_422() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/api/v1/schemas", Some(json!([1, 2]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "$root");
}

// =============================================================================
// Routing
// =============================================================================

#[tokio::test]
async fn test_trailing_slash_collection_path() {
    let app = app().await;
    let (status, _) = send(&app, Method::POST, "/api/v1/schemas/", Some(blog_payload())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = send(&app, Method::GET, "/api/v1/schemas/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_root_and_health() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Schema Designer API");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_custom_api_prefix() {
    let app = app_with(AppConfig {
        store_uri: "memory://".into(),
        api_prefix: "/designer/".into(),
        ..Default::default()
    })
    .await;

    let (status, _) = send(&app, Method::GET, "/designer/schemas", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/api/v1/schemas", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/schemas")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
}
