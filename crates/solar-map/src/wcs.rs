//! Linear helioprojective world coordinate system.
//!
//! Maps 0-based pixel indices (x = column, y = stored row) to helioprojective
//! longitude/latitude offsets (Tx, Ty) in arcseconds:
//!
//! ```text
//! [Tx, Ty] = CRVAL + CDELT * PC · ([x, y] + 1 - CRPIX)
//! ```
//!
//! The TAN projection term is ignored; inside 10 solar radii it changes
//! positions by less than one part in 10^4.

use corona_common::{CompositeError, CompositeResult};
use fits_io::Header;

/// Helioprojective WCS parameters from a FITS header.
#[derive(Debug, Clone, PartialEq)]
pub struct Wcs {
    /// Reference pixel (1-based, FITS convention)
    pub crpix: [f64; 2],
    /// Arcseconds per pixel along each axis
    pub cdelt: [f64; 2],
    /// World coordinate of the reference pixel (arcsec)
    pub crval: [f64; 2],
    /// Rotation/skew matrix
    pub pc: [[f64; 2]; 2],
    /// Inverse of `pc`
    pc_inv: [[f64; 2]; 2],
}

/// Arcseconds per unit of a CUNIT value.
fn unit_scale(unit: Option<&str>) -> CompositeResult<f64> {
    match unit.map(|u| u.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("arcsec") => Ok(1.0),
        Some("arcmin") => Ok(60.0),
        Some("deg") => Ok(3600.0),
        Some("rad") => Ok(180.0 / std::f64::consts::PI * 3600.0),
        Some(other) => Err(CompositeError::invalid_metadata(format!(
            "unsupported coordinate unit '{}'",
            other
        ))),
    }
}

fn invert(m: [[f64; 2]; 2]) -> CompositeResult<[[f64; 2]; 2]> {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    if det.abs() < 1e-12 {
        return Err(CompositeError::invalid_metadata("singular PC matrix"));
    }
    Ok([
        [m[1][1] / det, -m[0][1] / det],
        [-m[1][0] / det, m[0][0] / det],
    ])
}

impl Wcs {
    pub fn new(crpix: [f64; 2], cdelt: [f64; 2], crval: [f64; 2], pc: [[f64; 2]; 2]) -> CompositeResult<Self> {
        if cdelt[0] == 0.0 || cdelt[1] == 0.0 || !cdelt.iter().all(|c| c.is_finite()) {
            return Err(CompositeError::invalid_metadata(format!(
                "invalid pixel scale CDELT = {:?}",
                cdelt
            )));
        }
        Ok(Self {
            crpix,
            cdelt,
            crval,
            pc,
            pc_inv: invert(pc)?,
        })
    }

    /// Axis-aligned WCS with the given scale, centred on `center` (0-based).
    pub fn centered(center: [f64; 2], arcsec_per_pixel: f64) -> CompositeResult<Self> {
        Self::new(
            [center[0] + 1.0, center[1] + 1.0],
            [arcsec_per_pixel, arcsec_per_pixel],
            [0.0, 0.0],
            [[1.0, 0.0], [0.0, 1.0]],
        )
    }

    /// Build from CRPIXn, CDELTn, CRVALn, CUNITn and PCi_j or CROTA2.
    pub fn from_header(header: &Header) -> CompositeResult<Self> {
        let require = |key: &str| {
            header
                .get_f64(key)
                .ok_or_else(|| CompositeError::missing_metadata(key, "world coordinate system"))
        };

        let crpix = [require("CRPIX1")?, require("CRPIX2")?];
        let scale = [
            unit_scale(header.get_str("CUNIT1"))?,
            unit_scale(header.get_str("CUNIT2"))?,
        ];
        let cdelt = [require("CDELT1")? * scale[0], require("CDELT2")? * scale[1]];
        let crval = [
            header.get_f64("CRVAL1").unwrap_or(0.0) * scale[0],
            header.get_f64("CRVAL2").unwrap_or(0.0) * scale[1],
        ];

        let has_pc = ["PC1_1", "PC1_2", "PC2_1", "PC2_2"]
            .iter()
            .any(|k| header.contains(k));
        let pc = if has_pc {
            [
                [
                    header.get_f64("PC1_1").unwrap_or(1.0),
                    header.get_f64("PC1_2").unwrap_or(0.0),
                ],
                [
                    header.get_f64("PC2_1").unwrap_or(0.0),
                    header.get_f64("PC2_2").unwrap_or(1.0),
                ],
            ]
        } else {
            let crota = header.get_f64("CROTA2").or_else(|| header.get_f64("CROTA")).unwrap_or(0.0);
            let (sin, cos) = crota.to_radians().sin_cos();
            let ratio = cdelt[1] / cdelt[0];
            [[cos, -sin * ratio], [sin / ratio, cos]]
        };

        Self::new(crpix, cdelt, crval, pc)
    }

    /// Helioprojective (Tx, Ty) in arcsec of a 0-based pixel position.
    #[inline]
    pub fn pixel_to_world(&self, x: f64, y: f64) -> (f64, f64) {
        let px = x + 1.0 - self.crpix[0];
        let py = y + 1.0 - self.crpix[1];
        let ix = self.pc[0][0] * px + self.pc[0][1] * py;
        let iy = self.pc[1][0] * px + self.pc[1][1] * py;
        (
            self.crval[0] + self.cdelt[0] * ix,
            self.crval[1] + self.cdelt[1] * iy,
        )
    }

    /// 0-based pixel position of a helioprojective (Tx, Ty) in arcsec.
    #[inline]
    pub fn world_to_pixel(&self, tx: f64, ty: f64) -> (f64, f64) {
        let ix = (tx - self.crval[0]) / self.cdelt[0];
        let iy = (ty - self.crval[1]) / self.cdelt[1];
        let px = self.pc_inv[0][0] * ix + self.pc_inv[0][1] * iy;
        let py = self.pc_inv[1][0] * ix + self.pc_inv[1][1] * iy;
        (px + self.crpix[0] - 1.0, py + self.crpix[1] - 1.0)
    }

    /// Mean absolute pixel scale in arcsec.
    pub fn arcsec_per_pixel(&self) -> f64 {
        (self.cdelt[0].abs() + self.cdelt[1].abs()) / 2.0
    }
}
