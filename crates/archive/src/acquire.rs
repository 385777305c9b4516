//! Acquire the observation nearest in time to a target instant.

use std::path::PathBuf;

use corona_common::{CompositeResult, LogConfig};
use solar_map::{load_map, ObservationMap};
use tracing::{info, instrument};

use crate::client::ArchiveClient;
use crate::error::ArchiveResult;
use crate::query::{nearest_by_time, ArchiveQuery};

/// Search, pick the candidate nearest the query's target and download it.
///
/// `Ok(None)` means the search found nothing.
#[instrument(skip(client, query), fields(instrument = %query.instrument, wavelength = query.wavelength))]
pub async fn acquire_nearest<C>(client: &C, query: &ArchiveQuery) -> ArchiveResult<Option<PathBuf>>
where
    C: ArchiveClient + ?Sized,
{
    let target = query.target();
    let candidates = client.search(query).await?;

    let Some(nearest) = nearest_by_time(&candidates, &target) else {
        info!(target = %target, "No observations in search window");
        return Ok(None);
    };

    info!(
        record = %nearest.record,
        offset_secs = (nearest.time - target).num_seconds(),
        candidates = candidates.len(),
        "Selected nearest observation"
    );
    client.fetch(nearest).await.map(Some)
}

/// Like [`acquire_nearest`], loading the downloaded file as a map.
pub async fn acquire_map<C>(client: &C, query: &ArchiveQuery, log: &LogConfig) -> CompositeResult<Option<ObservationMap>>
where
    C: ArchiveClient + ?Sized,
{
    match acquire_nearest(client, query).await? {
        Some(path) => Ok(Some(load_map(&path, log)?)),
        None => Ok(None),
    }
}
