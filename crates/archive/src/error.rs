//! Archive error type.

use corona_common::CompositeError;
use thiserror::Error;

pub type ArchiveResult<T> = Result<T, ArchiveError>;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { status: u16, url: String },

    #[error("Archive query failed: {0}")]
    Query(String),

    #[error("Malformed archive response: {0}")]
    Response(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ArchiveError> for CompositeError {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Io(e) => CompositeError::Io(e),
            other => CompositeError::Archive(other.to_string()),
        }
    }
}
