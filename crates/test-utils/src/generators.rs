//! Synthetic solar images for tests.
//!
//! Images are row-major `Vec<f32>` with the Sun centred on the array unless
//! stated otherwise.

/// Distance of every pixel centre from the array centre, in pixels.
fn radius_grid(width: usize, height: usize) -> impl Iterator<Item = f32> {
    let cx = (width as f32 - 1.0) / 2.0;
    let cy = (height as f32 - 1.0) / 2.0;
    (0..height).flat_map(move |row| {
        (0..width).map(move |col| {
            let (dx, dy) = (col as f32 - cx, row as f32 - cy);
            (dx * dx + dy * dy).sqrt()
        })
    })
}

/// EUV-like image: bright disk with limb brightening and a steep
/// off-limb falloff.
///
/// # Example
///
/// ```
/// use test_utils::create_euv_image;
///
/// let img = create_euv_image(64, 64, 20.0);
/// assert!(img[32 * 64 + 32] > img[0]);
/// ```
pub fn create_euv_image(width: usize, height: usize, rsun_px: f32) -> Vec<f32> {
    radius_grid(width, height)
        .map(|r| {
            let rho = r / rsun_px;
            if rho <= 1.0 {
                800.0 + 400.0 * rho * rho
            } else {
                1200.0 * (-(rho - 1.0) * 8.0).exp()
            }
        })
        .collect()
}

/// Coronagraph-like image: occulted centre (zeros) and brightness falling
/// off as r^-3 outside `occulter_rsun` solar radii.
pub fn create_corona_image(width: usize, height: usize, rsun_px: f32, occulter_rsun: f32, peak: f32) -> Vec<f32> {
    radius_grid(width, height)
        .map(|r| {
            let rho = r / rsun_px;
            if rho < occulter_rsun {
                0.0
            } else {
                peak * (occulter_rsun / rho).powi(3)
            }
        })
        .collect()
}

/// A ramp from `min` to `max` across all pixels in row-major order.
pub fn create_ramp(width: usize, height: usize, min: f32, max: f32) -> Vec<f32> {
    let n = (width * height).max(2) - 1;
    (0..width * height)
        .map(|i| min + (max - min) * i as f32 / n as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_grid_centre() {
        let grid: Vec<f32> = radius_grid(5, 5).collect();
        assert_eq!(grid[2 * 5 + 2], 0.0);
        assert!((grid[0] - 8.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_euv_disk_brighter_than_corona() {
        let img = create_euv_image(41, 41, 10.0);
        assert!(img[20 * 41 + 20] > img[20 * 41 + 35]);
        assert!(img[0] < 1.0);
    }

    #[test]
    fn test_corona_is_occulted_and_decreasing() {
        let img = create_corona_image(101, 101, 10.0, 1.5, 100.0);
        assert_eq!(img[50 * 101 + 50], 0.0);
        let near = img[50 * 101 + 50 + 16];
        let far = img[50 * 101 + 50 + 40];
        assert!(near > far && far > 0.0);
    }

    #[test]
    fn test_ramp_bounds() {
        let ramp = create_ramp(4, 4, 10.0, 110.0);
        assert_eq!(ramp[0], 10.0);
        assert_eq!(ramp[15], 110.0);
    }
}
