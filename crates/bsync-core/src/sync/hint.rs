//! External change hints
//!
//! A filesystem notifier can report changes as they happen. Hints are a
//! latency optimisation only: they bridge straight to the store but never
//! touch the held snapshot, which stays owned by the worker's polling pass.

use std::path::{Path, PathBuf};

use bsync_fs::WorkspacePath;

use crate::bridge::DataBridge;
use crate::classify::{BridgeAction, action_for};
use crate::snapshot::is_index_name;
use crate::Result;

/// Coarse operation reported by a notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOp {
    CreateOrModify,
    Remove,
    RenameFile,
    RenameDir,
}

/// One notification: `(op, path, old_path)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeHint {
    pub op: HintOp,
    /// Absolute, or relative to the workspace root
    pub path: PathBuf,
    pub old_path: Option<PathBuf>,
}

impl ChangeHint {
    pub fn new(op: HintOp, path: impl Into<PathBuf>) -> Self {
        Self {
            op,
            path: path.into(),
            old_path: None,
        }
    }

    pub fn renamed(op: HintOp, old_path: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            op,
            path: path.into(),
            old_path: Some(old_path.into()),
        }
    }
}

/// Classify a hint and run the resulting action.
///
/// Renames are accepted but do nothing here; the next pass sees them as a
/// delete plus a create.
pub(crate) fn apply_hint(bridge: &DataBridge, hint: &ChangeHint) -> Result<Option<BridgeAction>> {
    let is_delete = match hint.op {
        HintOp::CreateOrModify => false,
        HintOp::Remove => true,
        HintOp::RenameFile | HintOp::RenameDir => {
            tracing::debug!(op = ?hint.op, path = %hint.path.display(), "Rename hint left to the next pass");
            return Ok(None);
        }
    };

    let root: &Path = bridge.root();
    let path = WorkspacePath::relative_to(root, &hint.path)?;
    if path.depth() == 1 && path.file_name().is_some_and(is_index_name) {
        return Ok(None);
    }

    let action = action_for(&path, is_delete, root)?;
    if let Some(action) = &action {
        bridge.apply(action)?;
    }
    Ok(action)
}
