//! Error types for FITS reading.

use corona_common::CompositeError;
use thiserror::Error;

/// Result type for FITS operations.
pub type FitsResult<T> = Result<T, FitsError>;

/// Error types for FITS reading.
#[derive(Error, Debug)]
pub enum FitsError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// cfitsio rejected the file or an HDU
    #[error("FITS error: {0}")]
    Cfitsio(#[from] fitsio::errors::Error),

    /// Header describes an image that cannot be held
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Fewer pixels than the image dimensions promise
    #[error("Truncated data: expected {expected} pixels, found {actual}")]
    Truncated { expected: usize, actual: usize },

    /// No HDU in the file holds a 2-D image
    #[error("No image HDU found")]
    NoImage,
}

impl FitsError {
    pub fn invalid_header(msg: impl Into<String>) -> Self {
        Self::InvalidHeader(msg.into())
    }
}

impl From<FitsError> for CompositeError {
    fn from(err: FitsError) -> Self {
        match err {
            FitsError::IoError(e) => CompositeError::Io(e),
            other => CompositeError::Fits(other.to_string()),
        }
    }
}
