//! Application configuration
//!
//! Loaded from an optional JSON file, then overridden by environment
//! variables, then validated. Every field except `store_uri` has a default.

use std::fs;
use std::path::Path;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors. All are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default = "default_version")]
    pub version: String,

    /// Versioned base path for the schema endpoints
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Store connection string (`memory://` or `file://<dir>`). Required.
    #[serde(default)]
    pub store_uri: String,

    #[serde(default = "default_database_name")]
    pub database_name: String,

    #[serde(default = "default_schemas_collection")]
    pub schemas_collection: String,

    /// CORS origins; empty means any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Increment `version` on every update
    #[serde(default)]
    pub bump_version_on_update: bool,
}

fn default_app_name() -> String {
    "DB Maker API".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_name() -> String {
    "db_maker".to_string()
}

fn default_schemas_collection() -> String {
    "schemas".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            version: default_version(),
            api_prefix: default_api_prefix(),
            host: default_host(),
            port: default_port(),
            store_uri: String::new(),
            database_name: default_database_name(),
            schemas_collection: default_schemas_collection(),
            allowed_origins: default_allowed_origins(),
            bump_version_on_update: false,
        }
    }
}

impl AppConfig {
    /// Load from `path` (if given), apply process environment overrides and
    /// validate.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config file without env overrides or validation
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Override fields from environment variables looked up through `lookup`.
    ///
    /// `DBMAKER_STORE_URI` wins over `MONGODB_URI` when both are set.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(uri) = lookup("DBMAKER_STORE_URI").or_else(|| lookup("MONGODB_URI")) {
            self.store_uri = uri;
        }
        if let Some(name) = lookup("DATABASE_NAME") {
            self.database_name = name;
        }
        if let Some(name) = lookup("SCHEMAS_COLLECTION") {
            self.schemas_collection = name;
        }
        if let Some(origins) = lookup("ALLOWED_ORIGINS") {
            self.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(prefix) = lookup("API_V1_STR") {
            self.api_prefix = prefix;
        }
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "PORT",
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.store_uri.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "store_uri is required (set MONGODB_URI or DBMAKER_STORE_URI)".into(),
            ));
        }

        if !self.api_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "api_prefix must start with '/': '{}'",
                self.api_prefix
            )));
        }

        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".into()));
        }

        for origin in &self.allowed_origins {
            if origin.parse::<HeaderValue>().is_err() {
                return Err(ConfigError::Invalid(format!(
                    "allowed_origins entry is not a valid header value: {:?}",
                    origin
                )));
            }
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
