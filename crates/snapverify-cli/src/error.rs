//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Library error
    #[error("{0}")]
    Verify(#[from] snapverify::VerifyError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output serialization error
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Comparison ran but the images did not match
    #[error("Images do not match")]
    Mismatch,
}

impl CliError {
    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use snapverify::VerifyError;

    #[test]
    fn test_invalid_argument() {
        let err = CliError::invalid_argument("bad tolerance");
        assert_eq!(err.to_string(), "Invalid argument: bad tolerance");
    }

    #[test]
    fn test_verify_error_is_transparent() {
        let err: CliError = VerifyError::parse("unknown column \"x\"").into();
        assert_eq!(err.to_string(), "Parse error: unknown column \"x\"");
    }

    #[test]
    fn test_io_from() {
        let err: CliError = std::io::Error::other("disk").into();
        assert!(err.to_string().contains("disk"));
    }
}
