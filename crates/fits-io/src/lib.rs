//! FITS access for solar observation files.
//!
//! Files are opened with `fitsio` (cfitsio), which covers the layouts AIA,
//! KCor and LASCO products use: primary or IMAGE extension arrays,
//! gzip-wrapped files and tile-compressed images. This crate finds the
//! first 2-D image, converts it to physical `f32` values with BLANK pixels
//! as NaN, and collects the keywords the map layer needs.
//!
//! # Example
//!
//! ```ignore
//! use fits_io::read_image;
//!
//! let image = read_image("20210101_120000_kcor_l2.fts.gz")?;
//! println!("{}x{} {:?}", image.width, image.height, image.header.get_str("INSTRUME"));
//! ```

pub mod error;
pub mod hdu;
pub mod keywords;

pub use error::{FitsError, FitsResult};
pub use hdu::{image_extent, read_image, FitsImage};
pub use keywords::{Header, Value};
