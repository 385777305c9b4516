//! Archive connection and search parameters.

use std::path::PathBuf;
use std::time::Duration;

use corona_common::{CompositeError, CompositeResult};
use serde::{Deserialize, Serialize};

/// Where and how EUV observations are searched for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// JSOC server root
    pub base_url: String,

    /// Data series holding AIA level 1 EUV images
    pub series: String,

    /// Directory downloaded files are stored in
    pub data_dir: PathBuf,

    /// Half-width of the search window, minutes
    pub window_minutes: i64,

    /// Sampling cadence inside the window, minutes
    pub cadence_minutes: i64,

    /// Default wavelength in angstrom
    pub wavelength: u32,

    /// HTTP request timeout
    pub request_timeout: Duration,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "http://jsoc.stanford.edu".to_string(),
            series: "aia.lev1_euv_12s".to_string(),
            data_dir: PathBuf::from("./data/aia"),
            window_minutes: 30,
            cadence_minutes: 10,
            wavelength: 171,
            request_timeout: Duration::from_secs(300),
        }
    }
}

impl ArchiveConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("JSOC_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(series) = std::env::var("AIA_SERIES") {
            config.series = series;
        }

        if let Ok(dir) = std::env::var("AIA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(val) = std::env::var("ARCHIVE_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.request_timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CompositeResult<()> {
        if self.base_url.is_empty() {
            return Err(CompositeError::InvalidConfig("archive base_url is empty".to_string()));
        }

        if self.series.is_empty() {
            return Err(CompositeError::InvalidConfig("archive series is empty".to_string()));
        }

        if self.window_minutes <= 0 {
            return Err(CompositeError::InvalidConfig("window_minutes must be > 0".to_string()));
        }

        if self.cadence_minutes <= 0 {
            return Err(CompositeError::InvalidConfig("cadence_minutes must be > 0".to_string()));
        }

        if self.wavelength == 0 {
            return Err(CompositeError::InvalidConfig("wavelength must be > 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArchiveConfig::default();
        assert_eq!(config.window_minutes, 30);
        assert_eq!(config.cadence_minutes, 10);
        assert_eq!(config.wavelength, 171);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_cadence() {
        let config = ArchiveConfig {
            cadence_minutes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
