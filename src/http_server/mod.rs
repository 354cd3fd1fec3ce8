//! # HTTP Server Module
//!
//! JSON API over axum for persisting schema designs.
//!
//! # Endpoints
//!
//! - `GET /` - Welcome message
//! - `GET /health` - Health check
//! - `POST|GET {prefix}/schemas` - Create, list
//! - `GET|PUT|DELETE {prefix}/schemas/{id}` - Fetch, partial update, delete

mod errors;
mod health_routes;
mod schema_routes;
mod server;

pub use errors::{ApiError, ApiResult, ErrorResponse};
pub use schema_routes::{schema_routes, SchemaState};
pub use server::HttpServer;
