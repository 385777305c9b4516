//! KCor product variants.

use corona_common::{CompositeError, CompositeResult};
use fits_io::Header;

const RADIALLY_FILTERED_CONTEXT: &str = "radially filtered KCor product";

/// Which kind of KCor image a map holds, decided once from its header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoronagraphProduct {
    /// Calibrated polarization brightness
    Raw,
    /// Normalizing-radial-graded-filter product with its display range
    RadiallyFiltered { display_min: f64, display_max: f64 },
}

impl CoronagraphProduct {
    /// Classify from the PRODUCT keyword.
    ///
    /// A radially filtered product must carry finite DISPMIN < DISPMAX.
    pub fn from_header(header: &Header) -> CompositeResult<Self> {
        let is_filtered = header
            .get_str("PRODUCT")
            .map(|p| p.to_uppercase().contains("NRGF"))
            .unwrap_or(false);
        if !is_filtered {
            return Ok(CoronagraphProduct::Raw);
        }

        let require = |key: &str| {
            header
                .get_f64(key)
                .ok_or_else(|| CompositeError::missing_metadata(key, RADIALLY_FILTERED_CONTEXT))
        };
        let display_min = require("DISPMIN")?;
        let display_max = require("DISPMAX")?;

        if !(display_min.is_finite() && display_max.is_finite()) || display_max <= display_min {
            return Err(CompositeError::invalid_metadata(format!(
                "{} display range [{}, {}] is empty",
                RADIALLY_FILTERED_CONTEXT, display_min, display_max
            )));
        }

        Ok(CoronagraphProduct::RadiallyFiltered {
            display_min,
            display_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fits_io::Value;

    fn header(entries: &[(&str, Value)]) -> Header {
        let mut h = Header::new();
        for (k, v) in entries {
            h.set(k, v.clone());
        }
        h
    }

    #[test]
    fn test_raw_when_product_absent_or_pb() {
        assert_eq!(CoronagraphProduct::from_header(&Header::new()).unwrap(), CoronagraphProduct::Raw);
        let h = header(&[("PRODUCT", Value::Text("pB".into()))]);
        assert_eq!(CoronagraphProduct::from_header(&h).unwrap(), CoronagraphProduct::Raw);
    }

    #[test]
    fn test_radially_filtered() {
        let h = header(&[
            ("PRODUCT", Value::Text("nrgf".into())),
            ("DISPMIN", Value::Float(-1.5)),
            ("DISPMAX", Value::Integer(3)),
        ]);
        assert_eq!(
            CoronagraphProduct::from_header(&h).unwrap(),
            CoronagraphProduct::RadiallyFiltered {
                display_min: -1.5,
                display_max: 3.0
            }
        );
    }

    #[test]
    fn test_missing_display_range_is_fatal() {
        let h = header(&[("PRODUCT", Value::Text("NRGF".into())), ("DISPMAX", Value::Float(1.0))]);
        let err = CoronagraphProduct::from_header(&h).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required metadata 'DISPMIN' (radially filtered KCor product)"
        );
    }

    #[test]
    fn test_inverted_display_range_is_fatal() {
        let h = header(&[
            ("PRODUCT", Value::Text("NRGF".into())),
            ("DISPMIN", Value::Float(2.0)),
            ("DISPMAX", Value::Float(2.0)),
        ]);
        assert!(matches!(
            CoronagraphProduct::from_header(&h),
            Err(CompositeError::InvalidMetadata(_))
        ));
    }
}
