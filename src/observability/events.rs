//! Observable events
//!
//! Every log line names exactly one of these. Events are explicit and typed
//! so log consumers can match on a closed set of names.

use std::fmt;

use super::logger::Severity;

/// Observable events in postd
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Data directory created by `postd init`
    DataDirInitialized,
    /// Record store opened
    StoreOpened,
    /// HTTP listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Server stopped
    ShutdownComplete,

    // Requests
    /// HTTP request finished
    RequestComplete,
    /// Request payload rejected by the validator
    ValidationFailed,

    // Posts
    PostCreated,
    PostUpdated,
    PostDeleted,

    // Failures
    /// Store operation failed while serving a request
    StoreFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",
            Event::StoreOpened => "STORE_OPENED",
            Event::Serving => "POSTD_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::RequestComplete => "REQUEST_COMPLETE",
            Event::ValidationFailed => "VALIDATION_FAILED",

            Event::PostCreated => "POST_CREATED",
            Event::PostUpdated => "POST_UPDATED",
            Event::PostDeleted => "POST_DELETED",

            Event::StoreFailed => "STORE_FAILED",
        }
    }

    /// Default severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::StoreFailed => Severity::Error,
            Event::ValidationFailed => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
