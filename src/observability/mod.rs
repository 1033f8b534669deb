//! Observability for postd
//!
//! Structured JSON-lines logging keyed by typed [`Event`]s.
//!
//! ```ignore
//! use postd::observability::{log_event, Event};
//!
//! log_event(Event::PostCreated, &[("id", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log an event at its default severity.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
