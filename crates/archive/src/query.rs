//! Archive search requests, their results, and nearest-in-time selection.

use chrono::{DateTime, Duration, Utc};
use corona_common::time::abs_difference;
use corona_common::{Instrument, TimeWindow};

use crate::config::ArchiveConfig;

/// A search for observations of one instrument and wavelength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveQuery {
    pub instrument: Instrument,
    /// Wavelength in angstrom
    pub wavelength: u32,
    pub window: TimeWindow,
    /// Sampling cadence inside the window
    pub cadence: Duration,
}

impl ArchiveQuery {
    /// Symmetric search around `target` using the configured window and cadence.
    pub fn around(target: DateTime<Utc>, instrument: Instrument, wavelength: u32, config: &ArchiveConfig) -> Self {
        Self {
            instrument,
            wavelength,
            window: TimeWindow::around(target, Duration::minutes(config.window_minutes)),
            cadence: Duration::minutes(config.cadence_minutes),
        }
    }

    /// Midpoint of the window, the instant the query was built for.
    pub fn target(&self) -> DateTime<Utc> {
        self.window.start + self.window.duration() / 2
    }
}

/// One stored observation returned by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Archive record identifier
    pub record: String,
    /// Observation time
    pub time: DateTime<Utc>,
    /// Where the data file can be downloaded from, when known
    pub url: Option<String>,
}

/// Candidate with the smallest absolute time difference to `target`.
///
/// Ties keep the earliest candidate in archive order. `None` when empty.
pub fn nearest_by_time<'a>(candidates: &'a [Candidate], target: &DateTime<Utc>) -> Option<&'a Candidate> {
    let mut best: Option<(&Candidate, Duration)> = None;
    for candidate in candidates {
        let diff = abs_difference(&candidate.time, target);
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((candidate, diff)),
        }
    }
    best.map(|(c, _)| c)
}
