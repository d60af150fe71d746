//! Command implementations for bsync-cli

pub mod status;
pub mod transfer;
pub mod watch;

pub use status::run_status;
pub use transfer::{run_export, run_import};
pub use watch::run_watch;

use std::path::Path;
use std::sync::Arc;

use bsync_core::SyncConfig;
use bsync_store::JsonFileStore;

use crate::error::Result;

/// Read the config file if one was given, defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Reading configuration");
            Ok(SyncConfig::load(path)?)
        }
        None => Ok(SyncConfig::default()),
    }
}

/// Open the JSON-backed store at `path`.
pub fn open_store(path: &Path) -> Result<Arc<JsonFileStore>> {
    Ok(Arc::new(JsonFileStore::open(path)?))
}
