//! Session and Configuration Error Types

use thiserror::Error;

/// Errors at the session boundary
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session actor has stopped
    #[error("Diagnostics session is closed")]
    Closed,

    /// Packet queue is full; the notification was dropped
    #[error("Packet queue full, notification dropped")]
    QueueFull,

    /// The session task panicked or was aborted
    #[error("Session task failed: {0}")]
    TaskFailed(String),
}

/// Errors loading session configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
