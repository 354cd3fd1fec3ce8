//! Observable events for dbmaker
//!
//! Every log line carries exactly one of these events. Events are explicit
//! and typed so that log consumers can match on stable names.

use std::fmt;

/// Observable events in dbmaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded and validated
    ConfigLoaded,
    /// HTTP server is about to bind
    ServerStarting,
    /// HTTP server is accepting requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,

    // Store connection
    /// Store client opened and pinged
    StoreConnected,
    /// Store client closed
    StoreClosed,
    /// Store operation failed
    StoreError,
    /// Store could not be reached during a request
    StoreUnreachable,

    // Schema operations
    /// Schema document created
    SchemaCreated,
    /// Schema document updated
    SchemaUpdated,
    /// Schema document deleted
    SchemaDeleted,
    /// Schema payload rejected by validation
    SchemaRejected,
    /// Stored schema document failed to map to the output model
    SchemaCorrupt,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStarting => "SERVER_STARTING",
            Event::Serving => "DBMAKER_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::StoreConnected => "STORE_CONNECTED",
            Event::StoreClosed => "STORE_CLOSED",
            Event::StoreError => "STORE_ERROR",
            Event::StoreUnreachable => "STORE_UNREACHABLE",

            Event::SchemaCreated => "SCHEMA_CREATED",
            Event::SchemaUpdated => "SCHEMA_UPDATED",
            Event::SchemaDeleted => "SCHEMA_DELETED",
            Event::SchemaRejected => "SCHEMA_REJECTED",
            Event::SchemaCorrupt => "SCHEMA_CORRUPT",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
