//! Processing parameters.

use corona_common::{CompositeError, CompositeResult};
use serde::{Deserialize, Serialize};

/// Thresholds and transforms applied by the per-source stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// AIA pixels beyond this many solar radii may be hidden
    pub aia_radius: f64,

    /// AIA pixels beyond `aia_radius` and dimmer than this are hidden
    pub aia_intensity_threshold: f64,

    /// KCor pixels beyond this many solar radii are hidden
    pub kcor_radius: f64,

    /// Exponent applied to raw KCor intensities
    pub kcor_gamma: f64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            aia_radius: 1.11,
            aia_intensity_threshold: 35.0,
            kcor_radius: 2.7,
            kcor_gamma: 0.7,
        }
    }
}

impl ProcessingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("AIA_RADIUS") {
            if let Ok(radius) = val.parse() {
                config.aia_radius = radius;
            }
        }

        if let Ok(val) = std::env::var("AIA_INTENSITY_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.aia_intensity_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("KCOR_RADIUS") {
            if let Ok(radius) = val.parse() {
                config.kcor_radius = radius;
            }
        }

        if let Ok(val) = std::env::var("KCOR_GAMMA") {
            if let Ok(gamma) = val.parse() {
                config.kcor_gamma = gamma;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CompositeResult<()> {
        if !(self.aia_radius.is_finite() && self.aia_radius > 0.0) {
            return Err(CompositeError::InvalidConfig("aia_radius must be > 0".to_string()));
        }

        if !self.aia_intensity_threshold.is_finite() {
            return Err(CompositeError::InvalidConfig(
                "aia_intensity_threshold must be finite".to_string(),
            ));
        }

        if !(self.kcor_radius.is_finite() && self.kcor_radius > 0.0) {
            return Err(CompositeError::InvalidConfig("kcor_radius must be > 0".to_string()));
        }

        if !(self.kcor_gamma.is_finite() && self.kcor_gamma > 0.0) {
            return Err(CompositeError::InvalidConfig("kcor_gamma must be > 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessingConfig::default();
        assert_eq!(config.aia_radius, 1.11);
        assert_eq!(config.aia_intensity_threshold, 35.0);
        assert_eq!(config.kcor_radius, 2.7);
        assert_eq!(config.kcor_gamma, 0.7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ProcessingConfig {
            kcor_gamma: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ProcessingConfig {
            aia_radius: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
