//! Error types for the demo.

use eventbus::EventBusError;
use thiserror::Error;

/// Errors that can occur while running the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Event bus error.
    #[error("event bus error: {0}")]
    Bus(#[from] EventBusError),

    /// Invalid game configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Report serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for demo operations.
pub type Result<T> = std::result::Result<T, DemoError>;
