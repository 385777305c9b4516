//! Time handling for solar observations.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Date/time layouts accepted on the command line and in FITS headers.
///
/// Order matters only for readability; the layouts are mutually exclusive.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d_%H:%M:%S%.f",
    "%Y%m%dT%H%M%S",
    "%Y%m%d_%H%M%S",
    "%Y%m%d.%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}

/// Parse a user or header supplied timestamp into a UTC instant.
///
/// Supports RFC 3339, ISO 8601 with `T` or space separators (optional
/// fractional seconds, optional trailing `Z`), slash-separated dates,
/// JSOC `YYYY.MM.DD_hh:mm:ss` records and compact `YYYYMMDD.HHMMSS` names.
/// Date-only strings resolve to midnight UTC.
pub fn parse_time(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::InvalidFormat(s.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = trimmed
        .strip_suffix('Z')
        .or_else(|| trimmed.strip_suffix("_UTC"))
        .unwrap_or(trimmed);

    for format in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, format) {
            if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&ndt));
            }
        }
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Compact timestamp used in output file names: `YYYYMMDD.HHMMSS`.
pub fn compact_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y%m%d.%H%M%S").to_string()
}

/// ISO-like timestamp used in titles: `YYYY-MM-DDTHH:MM:SS`.
pub fn iso_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Absolute difference between two instants.
pub fn abs_difference(a: &DateTime<Utc>, b: &DateTime<Utc>) -> Duration {
    let diff = *a - *b;
    if diff < Duration::zero() {
        -diff
    } else {
        diff
    }
}

/// A closed time window used for archive searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Symmetric window of `half_width` on either side of `center`.
    pub fn around(center: DateTime<Utc>, half_width: Duration) -> Self {
        Self {
            start: center - half_width,
            end: center + half_width,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }
}
