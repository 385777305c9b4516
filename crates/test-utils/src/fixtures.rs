//! Observation headers shaped like real AIA, KCor and LASCO products.
//!
//! Each helper returns a header builder for a `size`×`size` image with the
//! Sun at the array centre, ready to be extended with extra keywords.

use crate::fits::FitsHeaderBuilder;

/// Common time values for testing.
pub mod time {
    /// Composite request time used across the suite
    pub const REFERENCE_TIME: &str = "2021-01-01T12:00:00";

    /// Same instant in the compact form used in output file names
    pub const REFERENCE_COMPACT: &str = "20210101.120000";

    /// AIA observation five minutes before the reference
    pub const AIA_T_OBS: &str = "2021-01-01T11:55:00.57Z";
}

/// Approximate solar radius at the start of January, in arcseconds.
pub const RSUN_ARCSEC: f64 = 975.0;

fn centred(builder: FitsHeaderBuilder, size: usize, cdelt: f64) -> FitsHeaderBuilder {
    let crpix = (size as f64 + 1.0) / 2.0;
    builder
        .text("CTYPE1", "HPLN-TAN")
        .text("CTYPE2", "HPLT-TAN")
        .text("CUNIT1", "arcsec")
        .text("CUNIT2", "arcsec")
        .float("CRPIX1", crpix)
        .float("CRPIX2", crpix)
        .float("CRVAL1", 0.0)
        .float("CRVAL2", 0.0)
        .float("CDELT1", cdelt)
        .float("CDELT2", cdelt)
}

/// SDO/AIA level 1 image header. The frame is three solar radii wide.
pub fn aia_header(size: usize, wavelength: i64) -> FitsHeaderBuilder {
    let cdelt = 3.0 * RSUN_ARCSEC / size as f64;
    centred(FitsHeaderBuilder::image(size, size), size, cdelt)
        .text("TELESCOP", "SDO/AIA")
        .text("INSTRUME", "AIA_3")
        .text("DATE-OBS", "2021-01-01T11:55:00.57")
        .text("T_OBS", time::AIA_T_OBS)
        .int("WAVELNTH", wavelength)
        .text("WAVEUNIT", "angstrom")
        .float("RSUN_OBS", RSUN_ARCSEC)
        .float("DSUN_OBS", 1.471e11)
        .float("EXPTIME", 2.0)
}

/// MLSO K-Cor pB image header. The frame is six solar radii wide.
pub fn kcor_header(size: usize) -> FitsHeaderBuilder {
    kcor_product_header(size, "pB")
}

/// K-Cor header with an arbitrary PRODUCT value and no display range.
pub fn kcor_product_header(size: usize, product: &str) -> FitsHeaderBuilder {
    let cdelt = 6.0 * RSUN_ARCSEC / size as f64;
    centred(FitsHeaderBuilder::image(size, size), size, cdelt)
        .text("TELESCOP", "COSMO K-Coronagraph")
        .text("INSTRUME", "COSMO K-Coronagraph")
        .text("DATE-OBS", "2021-01-01T12:00:15")
        .text("PRODUCT", product)
        .float("RSUN_OBS", RSUN_ARCSEC)
        .float("RSUN", RSUN_ARCSEC)
}

/// K-Cor radially filtered (NRGF) product header with display bounds.
pub fn kcor_nrgf_header(size: usize, display_min: f64, display_max: f64) -> FitsHeaderBuilder {
    kcor_product_header(size, "NRGF")
        .float("DISPMIN", display_min)
        .float("DISPMAX", display_max)
}

/// SOHO/LASCO C2 header. No RSUN keyword; the radius comes from the date.
pub fn lasco_c2_header(size: usize) -> FitsHeaderBuilder {
    let cdelt = 12.0 * RSUN_ARCSEC / size as f64;
    centred(FitsHeaderBuilder::image(size, size), size, cdelt)
        .text("TELESCOP", "SOHO")
        .text("INSTRUME", "LASCO")
        .text("DETECTOR", "C2")
        .text("DATE-OBS", "2021/01/01")
        .text("TIME-OBS", "11:48:07.456")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_carry_pointing() {
        for header in [aia_header(64, 171), kcor_nrgf_header(64, 0.0, 1.0), lasco_c2_header(64)] {
            assert_eq!((header.width(), header.height()), (64, 64));
            assert!(header.contains("CRPIX1") && header.contains("CDELT2"));
        }
        assert!(!lasco_c2_header(64).contains("RSUN_OBS"));
    }
}
