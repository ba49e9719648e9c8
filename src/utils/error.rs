//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The call tree core itself is infallible; errors only come from the
//! instrumentation layer and from writing reports.

use thiserror::Error;

/// Errors that can occur while bracketing actions with start/stop
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("Action code {0} is not defined in the actions set")]
    InvalidAction(i32),

    #[error("Cannot stop action {action}: no action is active")]
    NoActiveAction { action: i32 },

    #[error("Stopped action {found} while action {expected} is active")]
    ActionMismatch { expected: i32, found: i32 },

    #[error("{0} action(s) were started but never stopped")]
    UnfinishedActions(usize),

    #[error("Cannot deactivate tracing: it is not active")]
    NotActive,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
