//! The observation map: an image plus the metadata needed to place it on
//! the sky.

use chrono::{DateTime, Utc};
use corona_common::{CompositeError, CompositeResult, Instrument, LogConfig};
use fits_io::{FitsImage, Header};

use crate::metadata::{observation_date, solar_radius_arcsec, wavelength, RadiusSource};
use crate::plot::PlotSettings;
use crate::wcs::Wcs;

/// A 2-D intensity array with its observation metadata.
///
/// `data` is row-major with row 0 being the first stored FITS row (the
/// bottom of the image on the sky). `mask`, when present, has one entry
/// per pixel and `true` hides the pixel.
#[derive(Debug, Clone)]
pub struct ObservationMap {
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    /// Header keywords, editable by processing stages
    pub meta: Header,
    pub instrument: Instrument,
    pub date: DateTime<Utc>,
    pub wcs: Wcs,
    /// Angular solar radius in arcsec
    pub rsun_obs: f64,
    /// Wavelength in angstrom, when recorded
    pub wavelength: Option<f64>,
    pub mask: Option<Vec<bool>>,
    pub plot: PlotSettings,
}

impl ObservationMap {
    /// Build a map from raw pixels and a header.
    pub fn new(data: Vec<f32>, width: usize, height: usize, meta: Header, log: &LogConfig) -> CompositeResult<Self> {
        let expected = width.checked_mul(height).ok_or_else(|| {
            CompositeError::invalid_metadata(format!("image size {}x{} overflows", width, height))
        })?;
        if data.len() != expected {
            return Err(CompositeError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }

        let instrument = Instrument::from_header_values(
            meta.get_str("INSTRUME"),
            meta.get_str("TELESCOP"),
            meta.get_str("DETECTOR"),
        );
        let date = observation_date(&meta)?;
        let wcs = Wcs::from_header(&meta)?;
        let (rsun_obs, radius_source) = solar_radius_arcsec(&meta, &date);
        if radius_source != RadiusSource::Keyword("RSUN_OBS") {
            log.library_warning(
                "solar-map",
                &format!(
                    "{} map has no RSUN_OBS; solar radius {:.2}\" from {:?}",
                    instrument, rsun_obs, radius_source
                ),
            );
        }
        let wavelength = wavelength(&meta);

        Ok(Self {
            data,
            width,
            height,
            plot: PlotSettings::for_instrument(instrument, wavelength),
            meta,
            instrument,
            date,
            wcs,
            rsun_obs,
            wavelength,
            mask: None,
        })
    }

    /// Build a map from a decoded FITS image, forwarding reader warnings.
    pub fn from_fits(image: FitsImage, log: &LogConfig) -> CompositeResult<Self> {
        for warning in &image.warnings {
            log.library_warning("fits-io", warning);
        }
        Self::new(image.data, image.width, image.height, image.header, log)
    }

    /// Label the map with the instrument it was supplied as, resetting the
    /// plot settings to that instrument's defaults when the header said
    /// otherwise.
    pub fn assign_instrument(&mut self, instrument: Instrument, log: &LogConfig) {
        if self.instrument == instrument {
            return;
        }
        log.library_warning(
            "solar-map",
            &format!(
                "header identifies the map as {}, using {} as supplied",
                self.instrument, instrument
            ),
        );
        self.instrument = instrument;
        self.plot = PlotSettings::for_instrument(instrument, self.wavelength);
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Solar radius in pixels.
    pub fn rsun_pixels(&self) -> f64 {
        self.rsun_obs / self.wcs.cdelt[0].abs()
    }

    /// Value at 0-based (x, y), or `None` outside the array.
    #[inline]
    pub fn value(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Whether the pixel at `index` is hidden by the mask.
    #[inline]
    pub fn is_masked(&self, index: usize) -> bool {
        self.mask
            .as_ref()
            .map(|m| m.get(index).copied().unwrap_or(true))
            .unwrap_or(false)
    }

    /// Attach a mask, checking it matches the image shape.
    pub fn set_mask(&mut self, mask: Vec<bool>) -> CompositeResult<()> {
        if mask.len() != self.data.len() {
            return Err(CompositeError::ShapeMismatch {
                expected: self.data.len(),
                actual: mask.len(),
            });
        }
        self.mask = Some(mask);
        Ok(())
    }

    /// Replace the pixel values, keeping shape and metadata.
    pub fn set_data(&mut self, data: Vec<f32>) -> CompositeResult<()> {
        if data.len() != self.data.len() {
            return Err(CompositeError::ShapeMismatch {
                expected: self.data.len(),
                actual: data.len(),
            });
        }
        self.data = data;
        Ok(())
    }

    /// Distance of every pixel from Sun centre in solar radii.
    pub fn radial_field(&self) -> RadialField {
        RadialField::from_map(self)
    }
}

/// Per-pixel distance from Sun centre, normalized by the solar radius.
#[derive(Debug, Clone)]
pub struct RadialField {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
}

impl RadialField {
    pub fn from_map(map: &ObservationMap) -> Self {
        let mut values = Vec::with_capacity(map.width * map.height);
        for y in 0..map.height {
            for x in 0..map.width {
                let (tx, ty) = map.wcs.pixel_to_world(x as f64, y as f64);
                values.push((tx * tx + ty * ty).sqrt() / map.rsun_obs);
            }
        }
        Self {
            width: map.width,
            height: map.height,
            values,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fits_io::Value;

    fn map_header(size: usize, cdelt: f64) -> Header {
        let mut h = Header::new();
        let crpix = (size as f64 + 1.0) / 2.0;
        h.set("INSTRUME", Value::Text("AIA_3".into()));
        h.set("DATE-OBS", Value::Text("2021-01-01T12:00:00".into()));
        h.set("CRPIX1", Value::Float(crpix));
        h.set("CRPIX2", Value::Float(crpix));
        h.set("CDELT1", Value::Float(cdelt));
        h.set("CDELT2", Value::Float(cdelt));
        h.set("RSUN_OBS", Value::Float(960.0));
        h
    }

    #[test]
    fn test_shape_mismatch() {
        let err = ObservationMap::new(vec![0.0; 10], 4, 4, map_header(4, 1.0), &LogConfig::default()).unwrap_err();
        assert!(matches!(err, CompositeError::ShapeMismatch { expected: 16, actual: 10 }));
    }

    #[test]
    fn test_oversized_shape_is_error() {
        let err = ObservationMap::new(vec![0.0; 4], usize::MAX, 2, map_header(2, 1.0), &LogConfig::default()).unwrap_err();
        assert!(matches!(err, CompositeError::InvalidMetadata(ref msg) if msg.contains("overflows")));
    }

    #[test]
    fn test_rsun_pixels_and_radial_field() {
        // 9x9 map, 240 arcsec per pixel: the disk spans 4 pixels in radius
        let map = ObservationMap::new(vec![0.0; 81], 9, 9, map_header(9, 240.0), &LogConfig::default()).unwrap();
        assert!((map.rsun_pixels() - 4.0).abs() < 1e-12);

        let field = map.radial_field();
        assert_eq!(field.get(4, 4), 0.0);
        assert!((field.get(8, 4) - 1.0).abs() < 1e-12);
        assert!((field.get(0, 0) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mask_must_match_shape() {
        let mut map = ObservationMap::new(vec![0.0; 4], 2, 2, map_header(2, 1.0), &LogConfig::default()).unwrap();
        assert!(map.set_mask(vec![false; 3]).is_err());
        map.set_mask(vec![false, true, false, false]).unwrap();
        assert!(map.is_masked(1));
        assert!(!map.is_masked(0));
    }

    #[test]
    fn test_instrument_and_plot_defaults() {
        let map = ObservationMap::new(vec![0.0; 4], 2, 2, map_header(2, 1.0), &LogConfig::default()).unwrap();
        assert_eq!(map.instrument, Instrument::Aia);
        assert_eq!(map.plot, PlotSettings::for_instrument(Instrument::Aia, None));
    }

    #[test]
    fn test_assign_instrument_overrides_header() {
        let mut map = ObservationMap::new(vec![0.0; 4], 2, 2, map_header(2, 1.0), &LogConfig::default()).unwrap();
        map.assign_instrument(Instrument::KCor, &LogConfig::default());
        assert_eq!(map.instrument, Instrument::KCor);
        assert_eq!(map.plot, PlotSettings::for_instrument(Instrument::KCor, None));
    }
}
