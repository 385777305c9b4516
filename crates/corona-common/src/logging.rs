//! Logging verbosity shared by the loaders and the archive client.

use tracing::{debug, warn};

/// Verbosity configuration handed to collaborators that produce
/// library-level diagnostics (FITS loading, archive queries).
///
/// Diagnostics that do not stop processing are reported at `warn` when
/// verbose and demoted to `debug` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub verbose: bool,
}

impl LogConfig {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Default filter directive for the tracing subscriber.
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Report a non-fatal diagnostic from a collaborator.
    pub fn library_warning(&self, source: &str, message: &str) {
        if self.verbose {
            warn!(source = source, "{}", message);
        } else {
            debug!(source = source, "{}", message);
        }
    }
}
