//! Result and error types for linecov.

use thiserror::Error;

/// Result type for linecov operations
pub type LinecovResult<T> = Result<T, LinecovError>;

/// Errors that can occur in linecov
#[derive(Debug, Error)]
pub enum LinecovError {
    /// Coverage requires the host's extended debug info mode
    #[error("Code coverage needs extended debug info; leave the extended_info setting enabled")]
    ExtendedInfoDisabled,

    /// Snapshot serialization failed
    #[error("Serialization failed: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_info_message() {
        let err = LinecovError::ExtendedInfoDisabled;
        assert!(err.to_string().contains("extended debug info"));
    }

    #[test]
    fn test_serialization_message() {
        let err = LinecovError::Serialization {
            message: "key must be a string".to_string(),
        };
        assert!(err.to_string().contains("Serialization failed"));
        assert!(err.to_string().contains("key must be a string"));
    }
}
