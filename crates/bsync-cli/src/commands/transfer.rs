//! One-shot export and import

use std::path::Path;

use colored::Colorize;

use bsync_core::{DataBridge, SyncConfig, TransferReport, WorkspaceSnapshot, index_path};

use crate::commands::open_store;
use crate::error::Result;

/// Write the whole store into the workspace.
///
/// The sync index is refreshed afterwards so a later `watch` starts from the
/// exported tree instead of re-importing it.
pub fn run_export(workspace: &Path, store: &Path, config: &SyncConfig) -> Result<()> {
    println!(
        "{} Exporting {} into {}",
        "=>".blue().bold(),
        store.display().to_string().cyan(),
        workspace.display().to_string().cyan()
    );

    std::fs::create_dir_all(workspace)?;
    let bridge = DataBridge::new(workspace, open_store(store)?);
    let report = bridge.export_all()?;
    refresh_index(workspace, config)?;

    print_report(&report);
    Ok(())
}

/// Make the store mirror the workspace.
pub fn run_import(workspace: &Path, store: &Path, config: &SyncConfig) -> Result<()> {
    println!(
        "{} Importing {} into {}",
        "=>".blue().bold(),
        workspace.display().to_string().cyan(),
        store.display().to_string().cyan()
    );

    if !workspace.is_dir() {
        return Err(crate::error::CliError::user(format!(
            "Workspace {} is not a directory",
            workspace.display()
        )));
    }
    let bridge = DataBridge::new(workspace, open_store(store)?);
    let report = bridge.import_workspace()?;
    refresh_index(workspace, config)?;

    print_report(&report);
    Ok(())
}

fn refresh_index(workspace: &Path, config: &SyncConfig) -> Result<()> {
    let snapshot = WorkspaceSnapshot::build(workspace, config.snapshot_options())?;
    snapshot.save(&index_path(workspace))?;
    Ok(())
}

fn print_report(report: &TransferReport) {
    println!(
        "{} {} bucket(s), {} file(s)",
        "OK".green().bold(),
        report.buckets,
        report.files
    );
    for error in &report.errors {
        println!("   {} {}", "!".red(), error);
    }
}
