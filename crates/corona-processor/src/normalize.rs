//! Intensity transforms for coronagraph images.
//!
//! NaN pixels pass through unchanged.

/// Replace negative values with zero.
pub fn clamp_negative(data: &mut [f32]) {
    for v in data.iter_mut() {
        if *v < 0.0 {
            *v = 0.0;
        }
    }
}

/// Raise every value to `gamma`. Values must already be non-negative.
pub fn apply_gamma(data: &mut [f32], gamma: f64) {
    for v in data.iter_mut() {
        *v = (*v as f64).powf(gamma) as f32;
    }
}

/// Clip to `[min, max]` and map linearly onto `[0, 1]`.
#[inline]
pub fn linear_rescale(value: f32, min: f64, max: f64) -> f32 {
    if value.is_nan() {
        return value;
    }
    let clipped = (value as f64).clamp(min, max);
    ((clipped - min) / (max - min)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_rescale_reference_points() {
        assert_eq!(linear_rescale(60.0, 10.0, 110.0), 0.5);
        assert_eq!(linear_rescale(10.0, 10.0, 110.0), 0.0);
        assert_eq!(linear_rescale(110.0, 10.0, 110.0), 1.0);
    }

    #[test]
    fn test_linear_rescale_clips() {
        assert_eq!(linear_rescale(-50.0, 10.0, 110.0), 0.0);
        assert_eq!(linear_rescale(1e9, 10.0, 110.0), 1.0);
        assert!(linear_rescale(f32::NAN, 10.0, 110.0).is_nan());
    }

    #[test]
    fn test_clamp_negative() {
        let mut data = vec![-1e-9, -5.0, f32::NEG_INFINITY, 0.0, 3.0];
        clamp_negative(&mut data);
        assert_eq!(data, vec![0.0, 0.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_gamma_one_is_identity() {
        let mut data = vec![0.0, 0.25, 1.0, 42.5];
        let expected = data.clone();
        apply_gamma(&mut data, 1.0);
        assert_eq!(data, expected);
    }

    #[test]
    fn test_gamma_below_one_is_monotonic() {
        let mut data: Vec<f32> = (0..1000).map(|i| i as f32 * 1e-3).collect();
        apply_gamma(&mut data, 0.7);
        assert!(data.windows(2).all(|w| w[1] >= w[0]));
    }
}
