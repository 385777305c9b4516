//! Solar observation maps.
//!
//! An [`ObservationMap`] pairs an intensity array with the metadata needed to
//! work in helioprojective coordinates: observation time, a linear WCS, the
//! angular solar radius and the instrument. Maps are loaded from FITS files
//! with [`load_map`].

pub mod loader;
pub mod map;
pub mod metadata;
pub mod plot;
pub mod wcs;

pub use loader::load_map;
pub use map::{ObservationMap, RadialField};
pub use metadata::{observation_date, solar_radius_arcsec, RadiusSource};
pub use plot::{ColormapKind, DisplayRange, PlotSettings, Stretch};
pub use wcs::Wcs;
