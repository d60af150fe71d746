//! Watch command: bootstrap then continuous sync

use std::path::Path;

use colored::Colorize;

use bsync_core::{BootstrapAction, SyncConfig, Synchronizer};

use crate::commands::open_store;
use crate::error::Result;

/// Run until Ctrl-C or until the workspace disappears.
pub fn run_watch(workspace: &Path, store: &Path, config: SyncConfig) -> Result<()> {
    let interval_ms = config.poll_interval_ms;
    let sync = Synchronizer::new(workspace, open_store(store)?).with_config(config);

    if let Some(outcome) = sync.init()? {
        let direction = match outcome.action {
            BootstrapAction::None => "nothing to reconcile",
            BootstrapAction::Export => "exported store to workspace",
            BootstrapAction::Import => "imported workspace into store",
        };
        println!("{} Bootstrap: {}", "=>".blue().bold(), direction);
        if let Some(report) = &outcome.transfer {
            for error in &report.errors {
                println!("   {} {}", "!".red(), error);
            }
        }
    }

    println!(
        "{} Watching {} every {} ms (Ctrl-C to stop)",
        "=>".blue().bold(),
        workspace.display().to_string().cyan(),
        interval_ms
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let handle = sync.watch()?;
        let token = handle.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, stopping");
                token.cancel();
            }
        });
        handle.join().await
    })?;

    println!("{} Stopped.", "OK".green().bold());
    Ok(())
}
