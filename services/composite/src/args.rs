//! Command-line arguments.

use std::path::PathBuf;

use archive::ArchiveConfig;
use clap::{Arg, ArgAction, CommandFactory, FromArgMatches, Parser};
use corona_common::{parse_time, CompositeResult, LogConfig};
use corona_processor::ProcessingConfig;
use renderer::RenderConfig;

use crate::pipeline::CompositeRequest;

/// Build an AIA, K-Cor and LASCO composite for one instant.
///
/// Processing and archive defaults can also be set through the environment
/// (or a `.env` file); flags take precedence.
#[derive(Parser, Debug, Clone)]
#[command(name = "kcor-composite", version, disable_version_flag = true)]
pub struct Args {
    /// Date/time to create the composite for, e.g. 2021-01-01T12:00:00
    pub time: String,

    /// AIA pixels beyond this radius (Rsun) and below the threshold are hidden [default: 1.11]
    #[arg(long)]
    pub aia_radius: Option<f64>,

    /// AIA intensity threshold [default: 35]
    #[arg(long)]
    pub aia_intensity_threshold: Option<f64>,

    /// AIA wavelength in angstrom [default: 171]
    #[arg(long)]
    pub aia_wavelength: Option<u32>,

    /// K-Cor level 2 FITS file
    #[arg(long)]
    pub kcor_filename: Option<PathBuf>,

    /// K-Cor pixels beyond this radius (Rsun) are hidden [default: 2.7]
    #[arg(long)]
    pub kcor_radius: Option<f64>,

    /// LASCO C2 FITS file
    #[arg(long)]
    pub lasco_filename: Option<PathBuf>,

    /// Output PNG path [default: <YYYYMMDD.HHMMSS>.<sources>.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Figure width in inches
    #[arg(long, default_value_t = 8.0)]
    pub width: f64,

    /// Figure height in inches
    #[arg(long, default_value_t = 8.0)]
    pub height: f64,

    /// Report library warnings and debug output
    #[arg(long)]
    pub verbose: bool,
}

impl Args {
    /// The clap command, with `-v/--version` in place of clap's `-V`.
    pub fn cli() -> clap::Command {
        Self::command().arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print version"),
        )
    }

    /// Parse the process arguments, exiting on error or `--version`.
    pub fn parse_args() -> Self {
        let matches = Self::cli().get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// Parse an explicit argument list.
    pub fn try_parse_args<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Self::cli().try_get_matches_from(iter)?;
        Self::from_arg_matches(&matches)
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig::new(self.verbose)
    }

    /// Environment defaults overridden by flags.
    pub fn processing_config(&self) -> ProcessingConfig {
        let mut config = ProcessingConfig::from_env();
        if let Some(radius) = self.aia_radius {
            config.aia_radius = radius;
        }
        if let Some(threshold) = self.aia_intensity_threshold {
            config.aia_intensity_threshold = threshold;
        }
        if let Some(radius) = self.kcor_radius {
            config.kcor_radius = radius;
        }
        config
    }

    /// Environment defaults overridden by flags.
    pub fn archive_config(&self) -> ArchiveConfig {
        let mut config = ArchiveConfig::from_env();
        if let Some(wavelength) = self.aia_wavelength {
            config.wavelength = wavelength;
        }
        config
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::with_size(self.width, self.height)
    }

    /// The composite request described by the arguments.
    pub fn request(&self) -> CompositeResult<CompositeRequest> {
        Ok(CompositeRequest {
            time: parse_time(&self.time)?,
            kcor_file: self.kcor_filename.clone(),
            lasco_file: self.lasco_filename.clone(),
            output: self.output.clone(),
        })
    }
}
