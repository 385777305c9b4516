//! Image HDU reading through cfitsio.
//!
//! cfitsio applies BSCALE/BZERO, expands gzip-wrapped files and decodes
//! tile-compressed images, so every supported layout arrives here as a
//! plain image HDU.

use std::path::Path;

use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::images::ImageType;
use fitsio::FitsFile;
use tracing::debug;

use crate::error::{FitsError, FitsResult};
use crate::keywords::{Header, Value};

/// Keywords read as strings.
const TEXT_KEYWORDS: &[&str] = &[
    "TELESCOP", "INSTRUME", "DETECTOR", "OBSRVTRY", "DATE-OBS", "DATE_OBS", "TIME-OBS", "T_OBS", "T_REC",
    "CTYPE1", "CTYPE2", "CUNIT1", "CUNIT2", "PRODUCT", "BUNIT", "WAVEUNIT", "EXTNAME",
];

/// Keywords read as numbers. A quoted number is kept as text.
const NUMERIC_KEYWORDS: &[&str] = &[
    "CRPIX1", "CRPIX2", "CDELT1", "CDELT2", "CRVAL1", "CRVAL2", "PC1_1", "PC1_2", "PC2_1", "PC2_2", "CROTA",
    "CROTA2", "RSUN_OBS", "RSUN_ARC", "RSUN", "DSUN_OBS", "WAVELNTH", "EXPTIME", "DISPMIN", "DISPMAX",
    "BSCALE", "BZERO", "BLANK",
];

/// A decoded 2-D image with its keywords.
#[derive(Debug, Clone)]
pub struct FitsImage {
    pub header: Header,
    pub width: usize,
    pub height: usize,
    /// Physical values in row-major order; row 0 is the first stored row
    pub data: Vec<f32>,
    /// Non-fatal oddities found while reading
    pub warnings: Vec<String>,
}

/// Width, height and plane count of an image HDU shape.
///
/// `shape` is in row-major order (slowest axis first), as cfitsio reports
/// it, so the last entry is NAXIS1.
pub fn image_extent(shape: &[usize]) -> FitsResult<(usize, usize, usize)> {
    let [planes @ .., height, width] = shape else {
        return Err(FitsError::NoImage);
    };
    let overflow = || FitsError::invalid_header(format!("image size {:?} overflows", shape));

    let planes = planes
        .iter()
        .try_fold(1usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(overflow)?;
    width
        .checked_mul(*height)
        .and_then(|plane| plane.checked_mul(planes))
        .ok_or_else(overflow)?;

    Ok((*width, *height, planes))
}

/// Read the first HDU holding a non-empty 2-D image.
pub fn read_image(path: impl AsRef<Path>) -> FitsResult<FitsImage> {
    let path = path.as_ref();
    // Surface a missing file as an I/O error rather than a cfitsio status
    std::fs::metadata(path)?;

    let mut fptr = FitsFile::open(path)?;
    let mut index = 0;
    while let Ok(hdu) = fptr.hdu(index) {
        if let HduInfo::ImageInfo { shape, image_type } = &hdu.info {
            if shape.len() >= 2 && shape.iter().all(|&n| n > 0) {
                debug!(path = %path.display(), hdu = index, shape = ?shape, "Reading image HDU");
                let integer = is_integer(image_type);
                let shape = shape.clone();
                return read_hdu(&mut fptr, &hdu, &shape, integer);
            }
        }
        index += 1;
    }

    Err(FitsError::NoImage)
}

fn is_integer(image_type: &ImageType) -> bool {
    !matches!(image_type, ImageType::Float | ImageType::Double)
}

fn read_hdu(fptr: &mut FitsFile, hdu: &FitsHdu, shape: &[usize], integer: bool) -> FitsResult<FitsImage> {
    let (width, height, planes) = image_extent(shape)?;
    let plane = width * height;
    let header = read_keywords(fptr, hdu);
    let mut warnings = Vec::new();

    if planes > 1 {
        warnings.push(format!("image has {} planes, using the first", planes));
    }

    let mut data: Vec<f32> = hdu.read_section(fptr, 0, plane)?;
    if data.len() != plane {
        return Err(FitsError::Truncated {
            expected: plane,
            actual: data.len(),
        });
    }

    if let Some(blank) = header.get_i64("BLANK") {
        if integer {
            let bscale = header.get_f64("BSCALE").unwrap_or(1.0);
            let bzero = header.get_f64("BZERO").unwrap_or(0.0);
            let undefined = (bzero + bscale * blank as f64) as f32;
            for v in data.iter_mut().filter(|v| **v == undefined) {
                *v = f32::NAN;
            }
        } else {
            warnings.push(format!("BLANK = {} ignored on a floating-point image", blank));
        }
    }

    Ok(FitsImage {
        header,
        width,
        height,
        data,
        warnings,
    })
}

fn read_keywords(fptr: &mut FitsFile, hdu: &FitsHdu) -> Header {
    let mut header = Header::new();

    for &key in TEXT_KEYWORDS {
        if let Ok(value) = hdu.read_key::<String>(fptr, key) {
            header.set(key, Value::Text(value.trim().to_string()));
        }
    }

    for &key in NUMERIC_KEYWORDS {
        if let Ok(value) = hdu.read_key::<f64>(fptr, key) {
            header.set(key, Value::Float(value));
        } else if let Ok(text) = hdu.read_key::<String>(fptr, key) {
            header.set(key, Value::Text(text.trim().to_string()));
        }
    }

    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_of_plain_image() {
        assert_eq!(image_extent(&[4, 6]).unwrap(), (6, 4, 1));
    }

    #[test]
    fn test_extent_with_degenerate_axis() {
        assert_eq!(image_extent(&[1, 3, 4]).unwrap(), (4, 3, 1));
        assert_eq!(image_extent(&[2, 3, 4]).unwrap(), (4, 3, 2));
    }

    #[test]
    fn test_extent_rejects_one_axis() {
        assert!(matches!(image_extent(&[16]), Err(FitsError::NoImage)));
        assert!(matches!(image_extent(&[]), Err(FitsError::NoImage)));
    }

    #[test]
    fn test_extent_overflow_is_error() {
        let huge = 8_589_934_592usize;
        let err = image_extent(&[huge, huge]).unwrap_err();
        assert!(matches!(err, FitsError::InvalidHeader(ref msg) if msg.contains("overflows")));

        let err = image_extent(&[usize::MAX, 2, 2]).unwrap_err();
        assert!(matches!(err, FitsError::InvalidHeader(_)));
    }
}
