//! CLI command implementations
//!
//! Startup order for `serve`: load config, connect the store, build the
//! router, serve. The store client is closed once the server stops.

use std::path::Path;

use crate::config::AppConfig;
use crate::http_server::HttpServer;
use crate::observability::{Event, Logger};
use crate::store::StoreClient;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(config.as_deref()),
        Command::CheckConfig { config } => check_config(config.as_deref()),
    }
}

/// Load configuration and log the outcome
fn load_config(config_path: Option<&Path>) -> CliResult<AppConfig> {
    let config = AppConfig::load(config_path)?;
    Logger::info(
        Event::ConfigLoaded,
        &[
            ("database", config.database_name.as_str()),
            ("collection", config.schemas_collection.as_str()),
            ("prefix", config.api_prefix.as_str()),
        ],
    );
    Ok(config)
}

/// Connect to the store and serve the HTTP API until Ctrl-C
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let client = StoreClient::connect(&config.store_uri).await?;
        Logger::info(
            Event::StoreConnected,
            &[("database", config.database_name.as_str())],
        );

        let server = HttpServer::new(config, client)?;
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the effective configuration after env overrides and validation
pub fn check_config(config_path: Option<&Path>) -> CliResult<()> {
    let config = AppConfig::load(config_path)?;
    write_json(&config)
}
