//! Radial masks. `true` marks a pixel to hide.
//!
//! Comparisons are strict: a pixel exactly at the threshold radius is kept.

use corona_common::{CompositeError, CompositeResult};
use solar_map::RadialField;

/// Hide every pixel farther than `threshold` solar radii from Sun centre.
pub fn radial_mask(field: &RadialField, threshold: f64) -> Vec<bool> {
    field.values.iter().map(|&r| r > threshold).collect()
}

/// Hide pixels that are both beyond `radius` solar radii and dimmer than
/// `intensity_threshold`.
///
/// Bright off-limb structure survives; faint off-limb noise does not.
/// NaN intensities compare false and are kept.
pub fn euv_mask(
    field: &RadialField,
    data: &[f32],
    radius: f64,
    intensity_threshold: f64,
) -> CompositeResult<Vec<bool>> {
    if data.len() != field.values.len() {
        return Err(CompositeError::ShapeMismatch {
            expected: field.values.len(),
            actual: data.len(),
        });
    }

    Ok(field
        .values
        .iter()
        .zip(data)
        .map(|(&r, &v)| r > radius && (v as f64) < intensity_threshold)
        .collect())
}
