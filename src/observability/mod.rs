//! Observability for dbmaker
//!
//! Structured JSON logging with a typed event vocabulary.
//!
//! ```ignore
//! use dbmaker::observability::{Event, Logger};
//!
//! Logger::info(Event::SchemaCreated, &[("id", &id)]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
