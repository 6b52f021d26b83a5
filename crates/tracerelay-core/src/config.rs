//! Configuration for the crash relay.
//!
//! All values are write-once-effectively: set them before the first `setup`
//! call. Writes after setup has started are undefined behavior and out of
//! scope.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Relay configuration, consumed when the context is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Collection endpoint the upload transport POSTs reports to.
    /// Required for uploads to be meaningful.
    pub endpoint_url: String,
    /// When true, setup logs the gathered host metadata at debug level.
    pub verbose: bool,
    /// Minimum elapsed time before submission completion is signalled, so a
    /// "submitting…" indicator is not reduced to a flicker.
    pub min_delay: Duration,
    /// Connect/read timeout for the upload transport; `None` uses the
    /// transport's default.
    pub http_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: String::new(),
            verbose: false,
            min_delay: Duration::ZERO,
            http_timeout: None,
        }
    }
}

impl Config {
    /// Creates a configuration posting to `endpoint_url` with all defaults.
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            ..Self::default()
        }
    }

    /// Enables verbose setup logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the minimum visible-duration floor.
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Sets the upload transport timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }
}
