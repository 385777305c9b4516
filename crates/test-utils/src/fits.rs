//! Synthetic FITS files for tests, written through cfitsio.
//!
//! Writers take an image shape plus keywords and panic on failure, since
//! they only ever run inside tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use fitsio::hdu::FitsHdu;
use fitsio::images::{ImageDescription, ImageType, WriteImage};
use fitsio::FitsFile;
use flate2::write::GzEncoder;
use flate2::Compression;

#[derive(Debug, Clone, PartialEq)]
enum Keyword {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Image shape and keywords for a synthetic file.
///
/// Structural keywords (BITPIX, NAXISn) come from the writer; only
/// observation metadata goes here.
#[derive(Debug, Clone)]
pub struct FitsHeaderBuilder {
    width: usize,
    height: usize,
    keywords: Vec<(String, Keyword)>,
}

impl FitsHeaderBuilder {
    pub fn image(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            keywords: Vec::new(),
        }
    }

    pub fn int(mut self, keyword: &str, value: i64) -> Self {
        self.keywords.push((keyword.to_uppercase(), Keyword::Int(value)));
        self
    }

    pub fn float(mut self, keyword: &str, value: f64) -> Self {
        self.keywords.push((keyword.to_uppercase(), Keyword::Float(value)));
        self
    }

    pub fn text(mut self, keyword: &str, value: &str) -> Self {
        self.keywords.push((keyword.to_uppercase(), Keyword::Text(value.to_string())));
        self
    }

    /// Drop every card named `keyword`.
    pub fn without(mut self, keyword: &str) -> Self {
        self.keywords.retain(|(k, _)| !k.eq_ignore_ascii_case(keyword));
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|(k, _)| k.eq_ignore_ascii_case(keyword))
    }

    fn dimensions(&self) -> [usize; 2] {
        [self.height, self.width]
    }

    /// Written after the pixels so BSCALE/BZERO only apply on read.
    fn write_keywords(&self, fptr: &mut FitsFile, hdu: &FitsHdu) {
        for (key, value) in &self.keywords {
            let written = match value {
                Keyword::Int(v) => hdu.write_key(fptr, key, *v),
                Keyword::Float(v) => hdu.write_key(fptr, key, *v),
                Keyword::Text(v) => hdu.write_key(fptr, key, v.as_str()),
            };
            written.unwrap_or_else(|e| panic!("write keyword {}: {}", key, e));
        }
    }
}

fn write_primary<T: WriteImage>(path: &Path, header: &FitsHeaderBuilder, data_type: ImageType, data: &[T]) {
    let dimensions = header.dimensions();
    let description = ImageDescription {
        data_type,
        dimensions: &dimensions,
    };
    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .overwrite()
        .open()
        .unwrap_or_else(|e| panic!("create {}: {}", path.display(), e));
    let hdu = fptr.primary_hdu().expect("primary HDU");
    hdu.write_image(&mut fptr, data).expect("write image");
    header.write_keywords(&mut fptr, &hdu);
}

/// A single-HDU file with BITPIX = -32 at `dir/name`.
pub fn write_fits_f32(dir: &Path, name: &str, header: &FitsHeaderBuilder, data: &[f32]) -> PathBuf {
    let path = dir.join(name);
    write_primary(&path, header, ImageType::Float, data);
    path
}

/// A single-HDU file with BITPIX = 16 at `dir/name`.
pub fn write_fits_i16(dir: &Path, name: &str, header: &FitsHeaderBuilder, data: &[i16]) -> PathBuf {
    let path = dir.join(name);
    write_primary(&path, header, ImageType::Short, data);
    path
}

/// An empty primary HDU followed by a Rice tile-compressed image extension.
pub fn write_fits_compressed_i16(dir: &Path, name: &str, header: &FitsHeaderBuilder, data: &[i16]) -> PathBuf {
    let path = dir.join(name);
    let target = format!("{}[compress]", path.display());
    let mut fptr = FitsFile::create(&target)
        .open()
        .unwrap_or_else(|e| panic!("create {}: {}", target, e));

    let dimensions = header.dimensions();
    let description = ImageDescription {
        data_type: ImageType::Short,
        dimensions: &dimensions,
    };
    let hdu = fptr
        .create_image("COMPRESSED_IMAGE".to_string(), &description)
        .expect("create image extension");
    hdu.write_image(&mut fptr, data).expect("write image");
    header.write_keywords(&mut fptr, &hdu);
    path
}

/// Gzip `path` into `path.gz` (the `.fts.gz` form archives distribute).
pub fn gzip_file(path: &Path) -> PathBuf {
    let raw = std::fs::read(path).expect("read file to gzip");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&raw).expect("gzip write");
    let gz = PathBuf::from(format!("{}.gz", path.display()));
    std::fs::write(&gz, encoder.finish().expect("gzip finish")).expect("write gzip file");
    gz
}

/// Write bytes to `dir/name` and return the path.
pub fn write_test_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write test file");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_file_starts_with_simple_card() {
        let dir = tempfile::tempdir().unwrap();
        let header = FitsHeaderBuilder::image(4, 2).text("INSTRUME", "AIA_3");
        let path = write_fits_f32(dir.path(), "a.fits", &header, &[0.0; 8]);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"SIMPLE  ="));
        assert_eq!(bytes.len() % 2880, 0);
    }

    #[test]
    fn test_gzip_file_adds_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_file(dir.path(), "x.fts", b"payload");
        let gz = gzip_file(&path);
        assert!(gz.to_string_lossy().ends_with("x.fts.gz"));
        assert_eq!(&std::fs::read(&gz).unwrap()[..2], &[0x1f, 0x8b]);
    }
}
