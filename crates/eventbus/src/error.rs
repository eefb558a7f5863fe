//! Error types for event bus operations.

use thiserror::Error;

/// Errors that can occur while dispatching events.
///
/// Registering, removing, and publishing to an event type with no handlers
/// are never errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventBusError {
    /// Lock poisoned (a thread panicked while holding a registry lock).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// A registration received an event of a different concrete type.
    #[error("event type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Type the registration was created for.
        expected: &'static str,
        /// Type of the event that was dispatched.
        actual: &'static str,
    },

    /// Nested dispatch on one thread went deeper than the configured limit.
    #[error("dispatch depth limit exceeded: {0}")]
    DepthExceeded(usize),
}

/// Result type alias for event bus operations.
pub type Result<T> = std::result::Result<T, EventBusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EventBusError::LockPoisoned("registry".to_string());
        assert_eq!(err.to_string(), "lock poisoned: registry");

        let err = EventBusError::TypeMismatch {
            expected: "Foo",
            actual: "Bar",
        };
        assert_eq!(err.to_string(), "event type mismatch: expected Foo, got Bar");

        let err = EventBusError::DepthExceeded(8);
        assert!(err.to_string().contains('8'));
    }
}
