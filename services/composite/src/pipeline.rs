//! The composite pipeline: acquire, load, process, render, write.

use std::path::{Path, PathBuf};

use archive::{acquire_map, ArchiveClient, ArchiveConfig, ArchiveQuery};
use chrono::{DateTime, Utc};
use corona_common::time::iso_timestamp;
use corona_common::{CompositeError, CompositeResult, Instrument, LogConfig};
use corona_processor::{process_aia, process_kcor, process_lasco, ProcessingConfig};
use renderer::{composite_title, default_filename, save_composite, RenderConfig};
use solar_map::{load_map, ObservationMap};
use tracing::{info, instrument};

/// One composite to produce.
#[derive(Debug, Clone)]
pub struct CompositeRequest {
    pub time: DateTime<Utc>,
    pub kcor_file: Option<PathBuf>,
    pub lasco_file: Option<PathBuf>,
    /// Explicit output path; derived from time and sources otherwise
    pub output: Option<PathBuf>,
}

/// Pipeline settings plus the archive the EUV layer comes from.
pub struct Pipeline<'a, C: ?Sized> {
    archive: &'a C,
    archive_config: ArchiveConfig,
    processing: ProcessingConfig,
    render: RenderConfig,
    log: LogConfig,
}

impl<'a, C> Pipeline<'a, C>
where
    C: ArchiveClient + ?Sized,
{
    pub fn new(
        archive: &'a C,
        archive_config: ArchiveConfig,
        processing: ProcessingConfig,
        render: RenderConfig,
        log: LogConfig,
    ) -> Self {
        Self {
            archive,
            archive_config,
            processing,
            render,
            log,
        }
    }

    /// Check every configuration before any work is done.
    pub fn validate(&self) -> CompositeResult<()> {
        self.archive_config.validate()?;
        self.processing.validate()?;
        self.render.validate()
    }

    /// Where the composite for `layers` is written.
    pub fn output_path(&self, request: &CompositeRequest, layers: &[ObservationMap]) -> PathBuf {
        request
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_filename(layers, &request.time)))
    }

    /// Load a local coronagraph file; the argument it came from decides its
    /// label in the title and file name.
    fn load_local(&self, path: &Path, instrument: Instrument) -> CompositeResult<ObservationMap> {
        let mut map = load_map(path, &self.log)?;
        map.assign_instrument(instrument, &self.log);
        Ok(map)
    }

    /// Produce the composite and return the written path.
    ///
    /// Local coronagraph files are read before the archive is queried. Any
    /// failure, including an empty AIA search, aborts before the output is
    /// written.
    #[instrument(skip(self, request), fields(time = %iso_timestamp(&request.time)))]
    pub async fn run(&self, request: &CompositeRequest) -> CompositeResult<PathBuf> {
        self.validate()?;

        let lasco = match &request.lasco_file {
            Some(path) => Some(process_lasco(self.load_local(path, Instrument::LascoC2)?)?),
            None => None,
        };
        let kcor = match &request.kcor_file {
            Some(path) => Some(process_kcor(self.load_local(path, Instrument::KCor)?, &self.processing)?),
            None => None,
        };

        let query = ArchiveQuery::around(
            request.time,
            Instrument::Aia,
            self.archive_config.wavelength,
            &self.archive_config,
        );
        let aia = acquire_map(self.archive, &query, &self.log).await?.ok_or_else(|| {
            CompositeError::DataNotAvailable(format!(
                "no AIA {} Å observation within {} minutes of {}",
                query.wavelength,
                self.archive_config.window_minutes,
                iso_timestamp(&request.time)
            ))
        })?;
        let aia = process_aia(aia, &self.processing)?;

        // Bottom layer first
        let layers: Vec<ObservationMap> = lasco.into_iter().chain(kcor).chain(Some(aia)).collect();

        let title = composite_title(&layers, &request.time);
        let path = self.output_path(request, &layers);
        save_composite(&layers, &title, &self.render, &path)?;

        info!(path = %path.display(), title = %title, "Composite complete");
        Ok(path)
    }
}
