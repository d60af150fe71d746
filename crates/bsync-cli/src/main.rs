//! bucketsync CLI
//!
//! Keeps a workspace directory and a JSON-backed bucket store in sync.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    tracing::debug!(command = ?cli.command, "Starting");

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Watch {
            target,
            interval_ms,
            fingerprint,
        } => {
            let mut config = config;
            if let Some(ms) = interval_ms {
                if ms == 0 {
                    return Err(error::CliError::user("--interval-ms must be greater than zero"));
                }
                config.poll_interval_ms = ms;
            }
            if fingerprint {
                config = config.with_fingerprint(true);
            }
            commands::run_watch(&target.workspace, &target.store, config)
        }
        Commands::Status { workspace, json } => commands::run_status(&workspace, &config, json),
        Commands::Export { target } => commands::run_export(&target.workspace, &target.store, &config),
        Commands::Import { target } => commands::run_import(&target.workspace, &target.store, &config),
    }
}
