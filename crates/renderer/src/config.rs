//! Figure geometry and colors.

use corona_common::{CompositeError, CompositeResult};
use serde::{Deserialize, Serialize};

/// Largest canvas edge accepted, in pixels.
pub const MAX_CANVAS_PIXELS: u32 = 16_384;

/// Smallest title band, in pixels.
pub const MIN_TITLE_HEIGHT: u32 = 12;

/// Output figure settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Figure width in inches
    pub width_in: f64,

    /// Figure height in inches
    pub height_in: f64,

    /// Pixels per inch
    pub dpi: f64,

    /// Height of the title band as a fraction of the canvas height
    pub title_fraction: f64,

    /// Gap between the plot square and the canvas edge, in pixels
    pub margin_px: u32,

    pub background: [u8; 4],

    /// Fill for plot pixels no layer covers
    pub plot_background: [u8; 4],

    pub text_color: [u8; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_in: 8.0,
            height_in: 8.0,
            dpi: 100.0,
            title_fraction: 0.06,
            margin_px: 8,
            background: [255, 255, 255, 255],
            plot_background: [0, 0, 0, 255],
            text_color: [0, 0, 0, 255],
        }
    }
}

impl RenderConfig {
    /// Default settings with a different figure size.
    pub fn with_size(width_in: f64, height_in: f64) -> Self {
        Self {
            width_in,
            height_in,
            ..Self::default()
        }
    }

    /// Canvas size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (
            (self.width_in * self.dpi).round() as u32,
            (self.height_in * self.dpi).round() as u32,
        )
    }

    /// Title band height in pixels.
    pub fn title_height(&self) -> u32 {
        let (_, height) = self.canvas_size();
        ((height as f64 * self.title_fraction).round() as u32).max(MIN_TITLE_HEIGHT)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> CompositeResult<()> {
        if !(self.width_in.is_finite() && self.width_in > 0.0) {
            return Err(CompositeError::InvalidConfig("width must be > 0".to_string()));
        }

        if !(self.height_in.is_finite() && self.height_in > 0.0) {
            return Err(CompositeError::InvalidConfig("height must be > 0".to_string()));
        }

        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(CompositeError::InvalidConfig("dpi must be > 0".to_string()));
        }

        if !(0.0..0.5).contains(&self.title_fraction) {
            return Err(CompositeError::InvalidConfig(
                "title_fraction must be in [0, 0.5)".to_string(),
            ));
        }

        let (width, height) = self.canvas_size();
        if width > MAX_CANVAS_PIXELS || height > MAX_CANVAS_PIXELS {
            return Err(CompositeError::InvalidConfig(format!(
                "canvas {}x{} exceeds {} pixels per side",
                width, height, MAX_CANVAS_PIXELS
            )));
        }

        let plot = width.min(height.saturating_sub(self.title_height()));
        if plot <= 2 * self.margin_px {
            return Err(CompositeError::InvalidConfig(format!(
                "canvas {}x{} leaves no room for the plot",
                width, height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_canvas() {
        let config = RenderConfig::default();
        assert_eq!(config.canvas_size(), (800, 800));
        assert_eq!(config.title_height(), 48);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(RenderConfig::with_size(0.0, 8.0).validate().is_err());
        assert!(RenderConfig::with_size(8.0, f64::NAN).validate().is_err());
        assert!(RenderConfig::with_size(500.0, 8.0).validate().is_err());
        assert!(RenderConfig::with_size(0.1, 0.1).validate().is_err());
    }

    #[test]
    fn test_with_size_keeps_dpi() {
        let config = RenderConfig::with_size(4.0, 3.0);
        assert_eq!(config.canvas_size(), (400, 300));
    }
}
