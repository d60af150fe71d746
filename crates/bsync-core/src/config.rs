//! Synchronizer configuration
//!
//! Read from a TOML file with a single `[sync]` section:
//!
//! ```toml
//! [sync]
//! poll_interval_ms = 1250
//! fingerprint = false
//! ```

use std::path::Path;
use std::time::Duration;

use bsync_fs::io;
use serde::{Deserialize, Serialize};

use crate::snapshot::SnapshotOptions;
use crate::{Error, Result};

fn default_poll_interval_ms() -> u64 {
    1250
}

/// Tunables for one synchronizer instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Period of the authoritative re-scan
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Compare content fingerprints in addition to size and mtime
    #[serde(default)]
    pub fingerprint: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            fingerprint: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    sync: Option<SyncConfig>,
}

impl SyncConfig {
    /// Parse configuration from TOML content.
    ///
    /// A missing `[sync]` section yields the defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use bsync_core::SyncConfig;
    ///
    /// let config = SyncConfig::parse("[sync]\npoll_interval_ms = 500\n").unwrap();
    /// assert_eq!(config.poll_interval_ms, 500);
    /// assert!(!config.fingerprint);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let config = file.sync.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_bytes(path)?;
        let content = String::from_utf8_lossy(&content);
        tracing::debug!(path = %path.display(), "Loading sync config");
        Self::parse(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config {
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Override the polling period.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis().max(1) as u64;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: bool) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn snapshot_options(&self) -> SnapshotOptions {
        SnapshotOptions {
            fingerprint: self.fingerprint,
        }
    }
}
