//! dbmaker - persistence backend for visual database-schema designs
//!
//! A design (tables, columns, relationships, indexes) is validated on the
//! way in, stored as one self-contained document, and served back over a
//! JSON HTTP API.

pub mod cli;
pub mod config;
pub mod http_server;
pub mod model;
pub mod observability;
pub mod repository;
pub mod store;
pub mod validation;
