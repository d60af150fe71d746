//! Status command: pending changes since the last sync

use std::path::Path;

use colored::Colorize;
use serde_json::json;

use bsync_core::{ChangeKind, ChangeOp, SyncConfig, WorkspaceSnapshot, diff, index_path, plan};

use crate::error::{CliError, Result};

/// Compare the persisted snapshot against the workspace as it is now.
pub fn run_status(workspace: &Path, config: &SyncConfig, as_json: bool) -> Result<()> {
    let index = index_path(workspace);
    if !index.exists() {
        return Err(CliError::user(format!(
            "No sync index in {}; run `bsync watch` or `bsync import` first",
            workspace.display()
        )));
    }

    let previous = WorkspaceSnapshot::load(&index)?;
    let current = WorkspaceSnapshot::build(workspace, config.snapshot_options())?;
    let changes = diff(&previous, &current);
    let actions = plan(&changes, workspace)?;

    if as_json {
        let output = json!({
            "workspace": workspace.display().to_string(),
            "changes": changes
                .iter()
                .map(|c| json!({"kind": c.kind.to_string(), "path": c.path.as_str()}))
                .collect::<Vec<_>>(),
            "actions": actions.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if changes.is_empty() {
        println!("{} Workspace is in sync.", "OK".green().bold());
        return Ok(());
    }

    println!("{} {} pending change(s):", "CHANGED".yellow().bold(), changes.len());
    for change in &changes {
        print_change(change);
    }
    println!();
    println!("{} store action(s) on next pass:", actions.len());
    for action in &actions {
        println!("   {} {}", "->".blue(), action);
    }
    Ok(())
}

fn print_change(change: &ChangeOp) {
    let marker = match change.kind {
        ChangeKind::CreateFile | ChangeKind::CreateDir => "+".green(),
        ChangeKind::Modify => "~".yellow(),
        ChangeKind::DeleteFile | ChangeKind::DeleteDir => "-".red(),
    };
    println!("   {} {:<7} {}", marker, change.kind.to_string(), change.path.as_str().cyan());
}
