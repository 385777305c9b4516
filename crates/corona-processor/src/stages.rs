//! Per-source processing stages.
//!
//! Each stage takes ownership of a loaded map and returns it with a mask
//! attached and, where the instrument needs it, transformed intensities.

use corona_common::CompositeResult;
use solar_map::{ColormapKind, DisplayRange, ObservationMap, PlotSettings, Stretch};
use tracing::debug;

use crate::config::ProcessingConfig;
use crate::mask::{euv_mask, radial_mask};
use crate::normalize::{apply_gamma, clamp_negative, linear_rescale};
use crate::product::CoronagraphProduct;

/// Hide faint off-limb AIA pixels. Intensities are left untouched.
pub fn process_aia(mut map: ObservationMap, config: &ProcessingConfig) -> CompositeResult<ObservationMap> {
    let field = map.radial_field();
    let mask = euv_mask(
        &field,
        &map.data,
        config.aia_radius,
        config.aia_intensity_threshold,
    )?;
    debug!(
        masked = mask.iter().filter(|m| **m).count(),
        radius = config.aia_radius,
        threshold = config.aia_intensity_threshold,
        "AIA mask"
    );
    map.set_mask(mask)?;
    Ok(map)
}

/// Normalize a KCor map for display and hide everything beyond the
/// configured radius.
///
/// Radially filtered products are rescaled to [0, 1] over their recorded
/// display range and drawn with the fixed NRGF table; raw products are
/// clamped at zero and gamma adjusted.
pub fn process_kcor(mut map: ObservationMap, config: &ProcessingConfig) -> CompositeResult<ObservationMap> {
    match CoronagraphProduct::from_header(&map.meta)? {
        CoronagraphProduct::RadiallyFiltered {
            display_min,
            display_max,
        } => {
            debug!(display_min, display_max, "KCor radially filtered product");
            let data = map
                .data
                .iter()
                .map(|v| linear_rescale(*v, display_min, display_max))
                .collect();
            map.set_data(data)?;
            map.plot = PlotSettings {
                colormap: ColormapKind::KcorNrgf,
                stretch: Stretch::Linear,
                range: DisplayRange::Fixed { min: 0.0, max: 1.0 },
            };
        }
        CoronagraphProduct::Raw => {
            debug!(gamma = config.kcor_gamma, "KCor raw product");
            clamp_negative(&mut map.data);
            apply_gamma(&mut map.data, config.kcor_gamma);
        }
    }

    let mask = radial_mask(&map.radial_field(), config.kcor_radius);
    map.set_mask(mask)?;
    Ok(map)
}

/// LASCO C2 maps are drawn as loaded.
pub fn process_lasco(map: ObservationMap) -> CompositeResult<ObservationMap> {
    debug!("LASCO map passed through");
    Ok(map)
}
