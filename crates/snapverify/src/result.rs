//! Result and error types for snapverify.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for snapverify operations
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Coarse classification of a [`VerifyError`], for callers that branch on
/// the kind of failure rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An image could not be read or decoded
    DecodeFailure,
    /// Baseline and current image have different dimensions
    DimensionMismatch,
    /// Same-size images differ by more than the threshold
    VisualMismatch,
    /// Capture, filesystem or encoding failure
    IoFailure,
    /// Tabular input or configuration could not be parsed
    ParseFailure,
    /// Caller supplied an out-of-range argument
    InvalidArgument,
}

/// Errors that can occur in snapverify
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Image could not be decoded
    #[error("Failed to decode image {}: {message}", .path.display())]
    Decode {
        /// Image path
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// Image dimensions differ
    #[error(
        "Image dimensions differ: baseline {}x{}, current {}x{}",
        .baseline.0, .baseline.1, .current.0, .current.1
    )]
    DimensionMismatch {
        /// Baseline width and height
        baseline: (u32, u32),
        /// Current width and height
        current: (u32, u32),
    },

    /// Images differ beyond the threshold
    #[error("Images differ by {:.2}%, threshold {:.2}%", .ratio * 100.0, .threshold * 100.0)]
    VisualMismatch {
        /// Fraction of differing pixels
        ratio: f64,
        /// Allowed fraction
        threshold: f64,
    },

    /// The screenshot source cannot capture (closed or never attached)
    #[error("Screenshot source unavailable")]
    SourceUnavailable,

    /// The screenshot source failed to capture
    #[error("Screenshot failed: {message}")]
    Capture {
        /// Error message
        message: String,
    },

    /// Tabular data could not be parsed
    #[error("Parse error: {message}")]
    Parse {
        /// Error message
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Threshold outside `[0, 1]`
    #[error("Threshold {value} is outside [0, 1]")]
    InvalidThreshold {
        /// Offending value
        value: f64,
    },

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VerifyError {
    /// Create a capture error
    #[must_use]
    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture {
            message: message.into(),
        }
    }

    /// Create a parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a decode error for the image at `path`
    #[must_use]
    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Classify the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode { .. } => ErrorKind::DecodeFailure,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::VisualMismatch { .. } => ErrorKind::VisualMismatch,
            Self::SourceUnavailable | Self::Capture { .. } | Self::Image(_) | Self::Io(_) => {
                ErrorKind::IoFailure
            }
            Self::Parse { .. } | Self::Config { .. } => ErrorKind::ParseFailure,
            Self::InvalidThreshold { .. } => ErrorKind::InvalidArgument,
        }
    }
}

/// Check that a threshold lies in `[0, 1]`
pub(crate) fn check_threshold(value: f64) -> VerifyResult<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(VerifyError::InvalidThreshold { value })
    }
}
