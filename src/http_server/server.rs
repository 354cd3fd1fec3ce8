//! # HTTP Server
//!
//! Combines the health and schema routers behind CORS, serves them until
//! Ctrl-C, then closes the store client.

use std::io;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppConfig;
use crate::observability::{Event, Logger};
use crate::repository::SchemaRepository;
use crate::store::{StoreClient, StoreResult};

use super::health_routes::health_routes;
use super::schema_routes::{schema_routes, SchemaState};

/// HTTP server for the schema designer API
pub struct HttpServer {
    config: AppConfig,
    client: Arc<StoreClient>,
    router: Router,
}

impl HttpServer {
    /// Create a server over an already-connected store client
    pub fn new(config: AppConfig, client: Arc<StoreClient>) -> StoreResult<Self> {
        let collection = client.collection(&config.database_name, &config.schemas_collection)?;
        let repository =
            SchemaRepository::new(collection).with_version_bump(config.bump_version_on_update);

        let router = Self::build_router(&config, Arc::new(SchemaState::new(repository)));
        Ok(Self {
            config,
            client,
            router,
        })
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &AppConfig, state: Arc<SchemaState>) -> Router {
        let cors = if config.allowed_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            // AppConfig::validate rejects unparseable entries at load
            let origins: Vec<HeaderValue> = config
                .allowed_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let prefix = config.api_prefix.trim_end_matches('/');
        let api = schema_routes(state);
        let router = Router::new().merge(health_routes());

        // axum refuses to nest at the root
        let router = if prefix.is_empty() {
            router.merge(api)
        } else {
            router.nest(prefix, api)
        };

        router.layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C, then close the store client
    pub async fn start(self) -> io::Result<()> {
        let addr = self.config.socket_addr();
        Logger::info(
            Event::ServerStarting,
            &[
                ("addr", addr.as_str()),
                ("app", self.config.app_name.as_str()),
                ("prefix", self.config.api_prefix.as_str()),
            ],
        );

        let listener = TcpListener::bind(&addr).await?;
        let local = listener.local_addr()?.to_string();
        Logger::info(Event::Serving, &[("addr", local.as_str())]);

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        self.client.close();
        Logger::info(Event::StoreClosed, &[]);
        Logger::info(Event::ShutdownComplete, &[]);

        result
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, serve until the process is killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    Logger::info(Event::ShutdownStart, &[]);
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn server(config: AppConfig) -> HttpServer {
        let client = StoreClient::connect("memory://").await.unwrap();
        HttpServer::new(config, client).unwrap()
    }

    #[tokio::test]
    async fn test_server_socket_addr() {
        let config = AppConfig {
            store_uri: "memory://".into(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(server(config).await.socket_addr(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_router_builds_at_root_prefix() {
        let config = AppConfig {
            store_uri: "memory://".into(),
            api_prefix: "/".into(),
            allowed_origins: Vec::new(),
            ..Default::default()
        };
        let _router = server(config).await.router();
    }

    #[tokio::test]
    async fn test_rejects_bad_collection_name() {
        let client = StoreClient::connect("memory://").await.unwrap();
        let config = AppConfig {
            store_uri: "memory://".into(),
            schemas_collection: "a/b".into(),
            ..Default::default()
        };
        assert!(HttpServer::new(config, client).is_err());
    }
}
