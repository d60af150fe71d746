//! One-time startup reconciliation
//!
//! Before continuous sync begins, exactly one direction is chosen:
//!
//! ```text
//!   workspace     store
//!   empty         empty      nothing to do
//!   empty    <-   has data   export store into the workspace
//!   has data ->   either     import workspace into the store
//! ```
//!
//! There is no merge. Once bootstrap is done the workspace is the only
//! source of truth.

use std::fs;
use std::path::Path;

use bsync_store::Store;

use crate::bridge::{DataBridge, TransferReport};
use crate::snapshot::{SnapshotOptions, WorkspaceSnapshot, index_path, is_index_name};
use crate::{Error, Result};

/// Direction chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapAction {
    /// Both sides empty
    None,
    /// Store to workspace
    Export,
    /// Workspace to store
    Import,
}

impl BootstrapAction {
    /// Pick the direction from what each side holds.
    pub fn decide(workspace_has_data: bool, store_has_data: bool) -> Self {
        match (workspace_has_data, store_has_data) {
            (false, false) => Self::None,
            (false, true) => Self::Export,
            (true, _) => Self::Import,
        }
    }
}

/// Result of a bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub action: BootstrapAction,
    /// Baseline the sync loop starts from
    pub snapshot: WorkspaceSnapshot,
    /// True if the baseline came from an existing sync index
    pub snapshot_loaded: bool,
    pub transfer: Option<TransferReport>,
}

/// True if `root` holds anything besides the sync index.
pub fn workspace_has_data(root: &Path) -> Result<bool> {
    let entries = fs::read_dir(root).map_err(|e| bsync_fs::Error::io(root, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| bsync_fs::Error::io(root, e))?;
        if !is_index_name(&entry.file_name().to_string_lossy()) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the workspace root if needed and check it is a directory.
fn ensure_root(root: &Path) -> Result<()> {
    if !root.exists() {
        tracing::info!(root = %root.display(), "Creating workspace directory");
        fs::create_dir_all(root).map_err(|e| bsync_fs::Error::io(root, e))?;
    } else if !root.is_dir() {
        return Err(Error::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

/// Reconcile the workspace and the store once, then produce the baseline
/// snapshot.
///
/// An existing sync index is trusted and loaded, except after an export,
/// which always rebuilds from the freshly written tree. A fresh baseline is
/// persisted immediately.
///
/// # Errors
///
/// Fails if the root cannot be created or read, the store cannot be
/// enumerated, the transfer fails outright, or the sync index is corrupt.
pub fn bootstrap(bridge: &DataBridge, options: SnapshotOptions) -> Result<BootstrapOutcome> {
    let root = bridge.root();
    ensure_root(root)?;

    let workspace_has_data = workspace_has_data(root)?;
    let store_has_data = bridge.store().has_data()?;
    let action = BootstrapAction::decide(workspace_has_data, store_has_data);
    tracing::info!(workspace_has_data, store_has_data, ?action, "Bootstrap decision");

    let transfer = match action {
        BootstrapAction::None => None,
        BootstrapAction::Export => Some(bridge.export_all()?),
        BootstrapAction::Import => Some(bridge.import_workspace()?),
    };

    let index = index_path(root);
    let (snapshot, snapshot_loaded) = if action != BootstrapAction::Export && index.exists() {
        (WorkspaceSnapshot::load(&index)?, true)
    } else {
        let snapshot = WorkspaceSnapshot::build(root, options)?;
        snapshot.save(&index)?;
        (snapshot, false)
    };
    tracing::debug!(entries = snapshot.len(), snapshot_loaded, "Bootstrap baseline ready");

    Ok(BootstrapOutcome {
        action,
        snapshot,
        snapshot_loaded,
        transfer,
    })
}
