//! The archive client interface.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ArchiveResult;
use crate::query::{ArchiveQuery, Candidate};

/// A remote archive that can be searched and downloaded from.
#[async_trait]
pub trait ArchiveClient: Send + Sync {
    /// Observations matching the query, in archive order.
    async fn search(&self, query: &ArchiveQuery) -> ArchiveResult<Vec<Candidate>>;

    /// Download one observation, returning the local file path.
    async fn fetch(&self, candidate: &Candidate) -> ArchiveResult<PathBuf>;
}
