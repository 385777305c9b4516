//! Acquisition tests against an in-memory archive.

use std::path::PathBuf;
use std::sync::Mutex;

use archive::{
    acquire_map, acquire_nearest, ArchiveClient, ArchiveConfig, ArchiveError, ArchiveQuery, ArchiveResult, Candidate,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use corona_common::{parse_time, CompositeError, Instrument, LogConfig};
use tempfile::TempDir;
use test_utils::{aia_header, create_euv_image, temp_test_dir, time::REFERENCE_TIME, write_fits_f32};

/// Serves a fixed candidate list and writes a synthetic AIA file on fetch.
struct MockArchive {
    candidates: Vec<Candidate>,
    dir: TempDir,
    fetched: Mutex<Vec<String>>,
}

impl MockArchive {
    fn new(times: &[DateTime<Utc>]) -> Self {
        let candidates = times
            .iter()
            .enumerate()
            .map(|(i, t)| Candidate {
                record: format!("aia.mock[{}]", i),
                time: *t,
                url: Some(format!("mock://{}", i)),
            })
            .collect();
        Self {
            candidates,
            dir: temp_test_dir(),
            fetched: Mutex::new(Vec::new()),
        }
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl ArchiveClient for MockArchive {
    async fn search(&self, _query: &ArchiveQuery) -> ArchiveResult<Vec<Candidate>> {
        Ok(self.candidates.clone())
    }

    async fn fetch(&self, candidate: &Candidate) -> ArchiveResult<PathBuf> {
        self.fetched.lock().unwrap().push(candidate.record.clone());
        Ok(write_fits_f32(self.dir.path(), "aia.fits", &aia_header(16, 171), &create_euv_image(16, 16, 5.0)))
    }
}

/// Search always fails.
struct UnreachableArchive;

#[async_trait]
impl ArchiveClient for UnreachableArchive {
    async fn search(&self, _query: &ArchiveQuery) -> ArchiveResult<Vec<Candidate>> {
        Err(ArchiveError::Status {
            status: 503,
            url: "mock://jsoc".to_string(),
        })
    }

    async fn fetch(&self, _candidate: &Candidate) -> ArchiveResult<PathBuf> {
        unreachable!("fetch after failed search")
    }
}

fn target() -> DateTime<Utc> {
    parse_time(REFERENCE_TIME).unwrap()
}

fn query() -> ArchiveQuery {
    ArchiveQuery::around(target(), Instrument::Aia, 171, &ArchiveConfig::default())
}

// ============================================================================
// Nearest selection
// ============================================================================

#[tokio::test]
async fn test_nearest_candidate_is_fetched() {
    let t = target();
    let archive = MockArchive::new(&[
        t - Duration::minutes(25),
        t - Duration::minutes(5),
        t + Duration::minutes(8),
    ]);

    let path = acquire_nearest(&archive, &query()).await.unwrap();
    assert!(path.is_some());
    assert_eq!(archive.fetched(), vec!["aia.mock[1]".to_string()]);
}

#[tokio::test]
async fn test_empty_search_is_none() {
    let archive = MockArchive::new(&[]);

    let path = acquire_nearest(&archive, &query()).await.unwrap();
    assert!(path.is_none());
    assert!(archive.fetched().is_empty());
}

#[tokio::test]
async fn test_search_failure_propagates() {
    let err = acquire_nearest(&UnreachableArchive, &query()).await.unwrap_err();
    assert!(matches!(err, ArchiveError::Status { status: 503, .. }));
}

// ============================================================================
// Map acquisition
// ============================================================================

#[tokio::test]
async fn test_acquire_map_loads_fetched_file() {
    let archive = MockArchive::new(&[target() - Duration::minutes(5)]);

    let map = acquire_map(&archive, &query(), &LogConfig::default()).await.unwrap().unwrap();
    assert_eq!(map.instrument, Instrument::Aia);
    assert_eq!(map.width, 16);
    assert_eq!(map.wavelength, Some(171.0));
}

#[tokio::test]
async fn test_acquire_map_empty_is_none() {
    let archive = MockArchive::new(&[]);
    let map = acquire_map(&archive, &query(), &LogConfig::default()).await.unwrap();
    assert!(map.is_none());
}

#[tokio::test]
async fn test_acquire_map_archive_error_converts() {
    let err = acquire_map(&UnreachableArchive, &query(), &LogConfig::default()).await.unwrap_err();
    assert!(matches!(err, CompositeError::Archive(_)));
}
