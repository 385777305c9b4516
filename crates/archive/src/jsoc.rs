//! JSOC (Joint Science Operations Center) client for SDO/AIA data.
//!
//! Searches go through the `jsoc_info` `rs_list` operation with a record set
//! such as `aia.lev1_euv_12s[2021-01-01T11:30:00Z/60m@10m][171]`, which lets
//! the server do the cadence sampling. Files are then fetched directly from
//! the segment paths the listing returns.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use corona_common::{parse_time, Instrument, LogConfig};
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::client::ArchiveClient;
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, ArchiveResult};
use crate::query::{ArchiveQuery, Candidate};

/// TAI − UTC since 2017-01-01, seconds.
const TAI_UTC_OFFSET_SECS: i64 = 37;

/// Keywords requested for every record.
const KEYWORDS: &str = "T_REC,T_OBS,WAVELNTH";

/// Image segment name in the AIA series.
const SEGMENT: &str = "image";

#[derive(Debug, Deserialize)]
struct RsListResponse {
    status: i64,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    keywords: Vec<Column>,
    #[serde(default)]
    segments: Vec<Column>,
}

#[derive(Debug, Deserialize)]
struct Column {
    name: String,
    #[serde(default)]
    values: Vec<String>,
}

impl RsListResponse {
    fn column<'a>(columns: &'a [Column], name: &str) -> Option<&'a [String]> {
        columns.iter().find(|c| c.name == name).map(|c| c.values.as_slice())
    }
}

/// Record set expression for a query against `series`.
pub fn record_set(series: &str, query: &ArchiveQuery) -> String {
    format!(
        "{}[{}/{}m@{}m][{}]",
        series,
        query.window.start.format("%Y-%m-%dT%H:%M:%SZ"),
        query.window.duration().num_minutes(),
        query.cadence.num_minutes(),
        query.wavelength
    )
}

/// Parse a JSOC time keyword. `_TAI` values are shifted to UTC; the
/// `MISSING` placeholder and anything unparseable give `None`.
pub fn parse_record_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    match value.strip_suffix("_TAI") {
        Some(tai) => parse_time(tai)
            .ok()
            .map(|t| t - chrono::Duration::seconds(TAI_UTC_OFFSET_SECS)),
        None => parse_time(value).ok(),
    }
}

/// Turn an `rs_list` JSON body into candidates.
///
/// Records without a usable time or data segment are skipped and reported
/// through `log`.
pub fn parse_rs_list(
    body: &str,
    series: &str,
    wavelength: u32,
    base_url: &str,
    log: &LogConfig,
) -> ArchiveResult<Vec<Candidate>> {
    let response: RsListResponse =
        serde_json::from_str(body).map_err(|e| ArchiveError::Response(e.to_string()))?;

    if response.status != 0 {
        return Err(ArchiveError::Query(
            response
                .error
                .unwrap_or_else(|| format!("jsoc_info status {}", response.status)),
        ));
    }

    let t_rec = RsListResponse::column(&response.keywords, "T_REC").unwrap_or(&[]);
    let t_obs = RsListResponse::column(&response.keywords, "T_OBS").unwrap_or(&[]);
    let segments = RsListResponse::column(&response.segments, SEGMENT).unwrap_or(&[]);

    let mut candidates = Vec::with_capacity(t_rec.len());
    for (i, rec) in t_rec.iter().enumerate() {
        let time = t_obs
            .get(i)
            .and_then(|t| parse_record_time(t))
            .or_else(|| parse_record_time(rec));
        let Some(time) = time else {
            log.library_warning("archive", &format!("record {} has no usable observation time", rec));
            continue;
        };

        let url = segments
            .get(i)
            .filter(|path| path.starts_with('/'))
            .map(|path| format!("{}{}", base_url, path));
        if url.is_none() {
            log.library_warning("archive", &format!("record {} has no data segment", rec));
            continue;
        }

        candidates.push(Candidate {
            record: format!("{}[{}][{}]", series, rec, wavelength),
            time,
            url,
        });
    }

    Ok(candidates)
}

/// Local file name for a record: every non-alphanumeric run becomes `_`.
pub fn record_filename(record: &str) -> String {
    let mut name = String::with_capacity(record.len() + 5);
    let mut last_sep = true;
    for c in record.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
            last_sep = false;
        } else if !last_sep {
            name.push('_');
            last_sep = true;
        }
    }
    let trimmed = name.trim_end_matches('_');
    format!("{}.fits", trimmed)
}

/// HTTP client for the JSOC archive.
pub struct JsocArchive {
    client: Client,
    config: ArchiveConfig,
    log: LogConfig,
}

impl JsocArchive {
    pub fn new(config: ArchiveConfig, log: LogConfig) -> ArchiveResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, config, log })
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    fn info_url(&self) -> String {
        format!("{}/cgi-bin/ajax/jsoc_info", self.config.base_url)
    }

    async fn download(&self, url: &str, path: &Path) -> ArchiveResult<()> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(ArchiveError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let partial = partial_path(path);
        let file = fs::File::create(&partial).await?;
        match save_body(response, file, &partial, path).await {
            Ok(written) => {
                debug!(bytes = written, path = %path.display(), "Download finished");
                Ok(())
            }
            Err(e) => {
                fs::remove_file(&partial).await.ok();
                Err(e)
            }
        }
    }
}

/// Download target while the body is still arriving.
fn partial_path(path: &Path) -> PathBuf {
    path.with_extension("fits.partial")
}

/// Stream the response body into `file`, then move `partial` into place.
async fn save_body(response: Response, mut file: fs::File, partial: &Path, path: &Path) -> ArchiveResult<u64> {
    let mut stream = response.bytes_stream();
    let mut written = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);
    fs::rename(partial, path).await?;
    Ok(written)
}

#[async_trait]
impl ArchiveClient for JsocArchive {
    #[instrument(skip(self, query), fields(series = %self.config.series, wavelength = query.wavelength))]
    async fn search(&self, query: &ArchiveQuery) -> ArchiveResult<Vec<Candidate>> {
        if query.instrument != Instrument::Aia {
            return Err(ArchiveError::Query(format!(
                "{} only serves AIA, not {}",
                self.config.series, query.instrument
            )));
        }

        let ds = record_set(&self.config.series, query);
        debug!(ds = %ds, "Querying JSOC");

        let response = self
            .client
            .get(self.info_url())
            .query(&[("op", "rs_list"), ("ds", ds.as_str()), ("key", KEYWORDS), ("seg", SEGMENT)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ArchiveError::Status {
                status: response.status().as_u16(),
                url: self.info_url(),
            });
        }

        let body = response.text().await?;
        let candidates = parse_rs_list(&body, &self.config.series, query.wavelength, &self.config.base_url, &self.log)?;
        info!(count = candidates.len(), "JSOC search complete");
        Ok(candidates)
    }

    #[instrument(skip(self, candidate), fields(record = %candidate.record))]
    async fn fetch(&self, candidate: &Candidate) -> ArchiveResult<PathBuf> {
        let url = candidate
            .url
            .as_deref()
            .ok_or_else(|| ArchiveError::Query(format!("record {} has no download URL", candidate.record)))?;

        fs::create_dir_all(&self.config.data_dir).await?;
        let path = self.config.data_dir.join(record_filename(&candidate.record));
        if fs::try_exists(&path).await? {
            info!(path = %path.display(), "File already downloaded, skipping");
            return Ok(path);
        }

        info!(url = %url, "Downloading observation");
        self.download(url, &path).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use corona_common::TimeWindow;

    const LISTING: &str = r#"{
        "keywords": [
            {"name": "T_REC", "values": ["2021-01-01T11:30:00Z", "2021-01-01T11:40:00Z", "2021-01-01T11:50:00Z"]},
            {"name": "T_OBS", "values": ["2021-01-01T11:30:09.35Z", "MISSING", "2021-01-01T11:50:09.35Z"]},
            {"name": "WAVELNTH", "values": ["171", "171", "171"]}
        ],
        "segments": [
            {"name": "image", "values": ["/SUM1/D1/S00000/image_lev1.fits", "/SUM1/D2/S00000/image_lev1.fits", "NoDataFile"], "dims": ["4096x4096"]}
        ],
        "count": 3,
        "runtime": 0.2,
        "status": 0
    }"#;

    #[test]
    fn test_record_set_expression() {
        let target = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        let query = ArchiveQuery {
            instrument: Instrument::Aia,
            wavelength: 171,
            window: TimeWindow::around(target, chrono::Duration::minutes(30)),
            cadence: chrono::Duration::minutes(10),
        };
        assert_eq!(
            record_set("aia.lev1_euv_12s", &query),
            "aia.lev1_euv_12s[2021-01-01T11:30:00Z/60m@10m][171]"
        );
    }

    #[test]
    fn test_parse_listing() {
        let candidates = parse_rs_list(LISTING, "aia.lev1_euv_12s", 171, "http://jsoc", &LogConfig::default()).unwrap();

        // Third record has no data file
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].record, "aia.lev1_euv_12s[2021-01-01T11:30:00Z][171]");
        assert_eq!(candidates[0].url.as_deref(), Some("http://jsoc/SUM1/D1/S00000/image_lev1.fits"));
        assert_eq!(candidates[0].time.format("%H:%M:%S%.3f").to_string(), "11:30:09.350");
        // Missing T_OBS falls back to T_REC
        assert_eq!(candidates[1].time, Utc.with_ymd_and_hms(2021, 1, 1, 11, 40, 0).unwrap());
    }

    #[test]
    fn test_parse_error_status() {
        let body = r#"{"status": 1, "error": "bad record set"}"#;
        let err = parse_rs_list(body, "aia.lev1_euv_12s", 171, "http://jsoc", &LogConfig::default()).unwrap_err();
        assert!(matches!(err, ArchiveError::Query(ref msg) if msg == "bad record set"));
    }

    #[test]
    fn test_parse_empty_listing() {
        let body = r#"{"keywords": [], "segments": [], "count": 0, "status": 0}"#;
        let candidates = parse_rs_list(body, "aia.lev1_euv_12s", 171, "http://jsoc", &LogConfig::default()).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_rs_list("<html>", "s", 171, "http://jsoc", &LogConfig::default()).unwrap_err();
        assert!(matches!(err, ArchiveError::Response(_)));
    }

    #[test]
    fn test_tai_times_shift_to_utc() {
        let t = parse_record_time("2021.01.01_12:00:37_TAI").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap());
        assert!(parse_record_time("MISSING").is_none());
    }

    #[test]
    fn test_record_filename() {
        assert_eq!(
            record_filename("aia.lev1_euv_12s[2021-01-01T11:30:00Z][171]"),
            "aia_lev1_euv_12s_2021_01_01t11_30_00z_171.fits"
        );
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(response: Vec<u8>) -> String {
        use tokio::io::AsyncReadExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}/SUM1/image_lev1.fits", addr)
    }

    fn archive_in(dir: &Path) -> JsocArchive {
        let config = ArchiveConfig {
            data_dir: dir.to_path_buf(),
            request_timeout: Duration::from_secs(5),
            ..ArchiveConfig::default()
        };
        JsocArchive::new(config, LogConfig::default()).unwrap()
    }

    fn candidate(url: Option<String>) -> Candidate {
        Candidate {
            record: "aia.lev1_euv_12s[2021-01-01T11:30:00Z][171]".to_string(),
            time: Utc.with_ymd_and_hms(2021, 1, 1, 11, 30, 9).unwrap(),
            url,
        }
    }

    fn leftover_partials(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|p| p.to_string_lossy().ends_with(".partial"))
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_existing_file_skips_download() {
        let dir = tempfile::tempdir().unwrap();
        let candidate = candidate(Some("http://127.0.0.1:1/unreachable.fits".to_string()));
        let existing = dir.path().join(record_filename(&candidate.record));
        std::fs::write(&existing, b"cached").unwrap();

        let path = archive_in(dir.path()).fetch(&candidate).await.unwrap();
        assert_eq!(path, existing);
        assert_eq!(std::fs::read(&path).unwrap(), b"cached");
    }

    #[tokio::test]
    async fn test_fetch_without_url_is_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = archive_in(dir.path()).fetch(&candidate(None)).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Query(_)));
    }

    #[tokio::test]
    async fn test_fetch_writes_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 6\r\nConnection: close\r\n\r\nSIMPLE".to_vec()).await;

        let path = archive_in(dir.path()).fetch(&candidate(Some(url))).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"SIMPLE");
        assert!(leftover_partials(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_interrupted_download_removes_partial() {
        let dir = tempfile::tempdir().unwrap();
        // Connection closes after 6 of the promised 2880 bytes
        let url = serve_once(b"HTTP/1.1 200 OK\r\nContent-Length: 2880\r\nConnection: close\r\n\r\nSIMPLE".to_vec()).await;
        let candidate = candidate(Some(url));

        let err = archive_in(dir.path()).fetch(&candidate).await;
        assert!(err.is_err());
        assert!(leftover_partials(dir.path()).is_empty());
        assert!(!dir.path().join(record_filename(&candidate.record)).exists());
    }

    #[tokio::test]
    async fn test_search_rejects_other_instruments() {
        let dir = tempfile::tempdir().unwrap();
        let target = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        let query = ArchiveQuery::around(target, Instrument::KCor, 171, &ArchiveConfig::default());

        let err = archive_in(dir.path()).search(&query).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Query(ref msg) if msg.contains("KCor")));
    }
}
