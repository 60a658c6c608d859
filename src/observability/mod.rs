//! Observability for linestore
//!
//! - Structured JSON log lines on stderr
//! - Typed events with a default severity
//! - Scope-based begin/complete logging
//!
//! Observability is read-only: a failure to log never changes the outcome
//! of a store operation.
//!
//! ```ignore
//! use linestore::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::StoreAppend, &[("path", "students.txt")]);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log an event at its default severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
