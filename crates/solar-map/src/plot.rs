//! Display settings carried by each map: colormap, stretch and value range.
//!
//! These only name how a map should be drawn; the lookup tables and the
//! drawing itself live in the renderer.

use corona_common::Instrument;
use serde::{Deserialize, Serialize};

/// Colormap a layer is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColormapKind {
    Gray,
    /// IDL color table 3
    RedTemperature,
    /// SDO/AIA channel colormap for a wavelength in angstrom
    Aia(u32),
    /// Fixed table distributed with radially filtered K-Cor products
    KcorNrgf,
}

/// Non-linear display stretch applied after normalization to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stretch {
    Linear,
    Sqrt,
    /// `asinh(x / a) / asinh(1 / a)`
    Asinh { a: f64 },
    Power { exponent: f64 },
}

impl Stretch {
    /// Apply to a value already normalized to [0, 1].
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match *self {
            Stretch::Linear => x,
            Stretch::Sqrt => x.sqrt(),
            Stretch::Asinh { a } => (x / a).asinh() / (1.0 / a).asinh(),
            Stretch::Power { exponent } => x.powf(exponent),
        }
    }
}

/// Value range mapped onto [0, 1] before stretching.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DisplayRange {
    /// Minimum and maximum over unmasked finite pixels
    Auto,
    Fixed { min: f64, max: f64 },
}

/// How a map is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotSettings {
    pub colormap: ColormapKind,
    pub stretch: Stretch,
    pub range: DisplayRange,
}

impl PlotSettings {
    /// Default settings for a freshly loaded map of this instrument.
    pub fn for_instrument(instrument: Instrument, wavelength: Option<f64>) -> Self {
        match instrument {
            Instrument::Aia => Self {
                colormap: ColormapKind::Aia(wavelength.map(|w| w.round() as u32).unwrap_or(171)),
                stretch: Stretch::Asinh { a: 0.01 },
                range: DisplayRange::Auto,
            },
            Instrument::LascoC2 => Self {
                colormap: ColormapKind::RedTemperature,
                stretch: Stretch::Sqrt,
                range: DisplayRange::Auto,
            },
            Instrument::KCor | Instrument::Unknown => Self {
                colormap: ColormapKind::Gray,
                stretch: Stretch::Linear,
                range: DisplayRange::Auto,
            },
        }
    }
}
