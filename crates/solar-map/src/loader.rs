//! Loading observation maps from FITS files.

use std::path::Path;

use corona_common::{CompositeResult, LogConfig};
use fits_io::read_image;
use tracing::{debug, info};

use crate::map::ObservationMap;

/// Read the first image of a FITS file (plain, gzip or tile compressed) as a map.
pub fn load_map(path: impl AsRef<Path>, log: &LogConfig) -> CompositeResult<ObservationMap> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Reading FITS file");

    let image = read_image(path)?;
    let map = ObservationMap::from_fits(image, log)?;

    info!(
        path = %path.display(),
        instrument = %map.instrument,
        date = %map.date,
        width = map.width,
        height = map.height,
        "Loaded map"
    );
    Ok(map)
}
