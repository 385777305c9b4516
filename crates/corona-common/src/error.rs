//! Error types for corona composite processing.

use thiserror::Error;

use crate::time::TimeParseError;

/// Result type alias using CompositeError.
pub type CompositeResult<T> = Result<T, CompositeError>;

/// Primary error type for the composite pipeline.
#[derive(Debug, Error)]
pub enum CompositeError {
    // === Input Errors ===
    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Missing required metadata '{keyword}' ({context})")]
    MissingMetadata { keyword: String, context: String },

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Data Errors ===
    #[error("Data not available: {0}")]
    DataNotAvailable(String),

    #[error("Invalid FITS data: {0}")]
    Fits(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Array shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompositeError {
    /// Create a MissingMetadata error.
    pub fn missing_metadata(keyword: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingMetadata {
            keyword: keyword.into(),
            context: context.into(),
        }
    }

    /// Create an InvalidMetadata error.
    pub fn invalid_metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }

    /// Whether the failure comes from user-supplied input rather than the
    /// environment (archive, filesystem).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CompositeError::InvalidTime(_)
                | CompositeError::MissingMetadata { .. }
                | CompositeError::InvalidMetadata(_)
                | CompositeError::InvalidConfig(_)
                | CompositeError::Fits(_)
        )
    }
}

impl From<TimeParseError> for CompositeError {
    fn from(err: TimeParseError) -> Self {
        CompositeError::InvalidTime(err.to_string())
    }
}
