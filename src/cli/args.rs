//! CLI argument definitions using clap
//!
//! Commands:
//! - dbmaker serve [--config <path>]
//! - dbmaker check-config [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dbmaker - persistence backend for visual database-schema designs
#[derive(Parser, Debug)]
#[command(name = "dbmaker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the store and serve the HTTP API
    Serve {
        /// Path to a JSON configuration file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load and validate configuration, then print it as JSON
    CheckConfig {
        /// Path to a JSON configuration file; environment variables override it
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
