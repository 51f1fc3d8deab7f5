//! Error types for the ApMatch kernel library.

use thiserror::Error;

/// Result type alias using `KernelError`.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors that can occur during kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Kernel not found in registry.
    #[error("Kernel not found: {0}")]
    KernelNotFound(String),

    /// Kernel already registered.
    #[error("Kernel already registered: {0}")]
    KernelAlreadyRegistered(String),

    /// Input validation failed.
    #[error("Input validation failed: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Timeout waiting for a kernel to complete.
    #[error("Timeout waiting for response after {0:?}")]
    Timeout(std::time::Duration),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl KernelError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        KernelError::ValidationError(msg.into())
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        KernelError::ConfigError(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        KernelError::InternalError(msg.into())
    }

    /// Create a kernel not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        KernelError::KernelNotFound(id.into())
    }

    /// Returns true if this is a recoverable error.
    ///
    /// Validation and timeout failures are caller-correctable; registry and
    /// configuration failures are not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            KernelError::ValidationError(_) | KernelError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(
            KernelError::validation("bad input"),
            KernelError::ValidationError(_)
        ));
        assert!(matches!(
            KernelError::config("bad tolerance"),
            KernelError::ConfigError(_)
        ));
        assert!(matches!(
            KernelError::not_found("x"),
            KernelError::KernelNotFound(_)
        ));
    }

    #[test]
    fn test_recoverable() {
        assert!(KernelError::validation("x").is_recoverable());
        assert!(KernelError::Timeout(std::time::Duration::from_secs(1)).is_recoverable());
        assert!(!KernelError::config("x").is_recoverable());
        assert!(!KernelError::KernelAlreadyRegistered("x".into()).is_recoverable());
    }

    #[test]
    fn test_display() {
        let err = KernelError::validation("quantity must be positive");
        assert_eq!(
            err.to_string(),
            "Input validation failed: quantity must be positive"
        );
    }
}
