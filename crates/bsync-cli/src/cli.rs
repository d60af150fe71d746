//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// bucketsync - keep a directory tree and a bucket store in sync
#[derive(Parser, Debug)]
#[command(name = "bsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file with a [sync] section
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Workspace and store locations shared by most commands
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Workspace root directory
    #[arg(short, long)]
    pub workspace: PathBuf,

    /// JSON file backing the store (created if missing)
    #[arg(short, long)]
    pub store: PathBuf,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Bootstrap, then keep syncing until interrupted
    ///
    /// Examples:
    ///   bsync watch -w ./data -s store.json
    ///   bsync watch -w ./data -s store.json --interval-ms 500
    Watch {
        #[command(flatten)]
        target: Target,

        /// Polling period in milliseconds (overrides the config file)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Compare content fingerprints, not just size and mtime
        #[arg(long)]
        fingerprint: bool,
    },

    /// Show what changed on disk since the last sync
    Status {
        /// Workspace root directory
        #[arg(short, long)]
        workspace: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write every bucket in the store into the workspace
    Export {
        #[command(flatten)]
        target: Target,
    },

    /// Make the store mirror the workspace
    Import {
        #[command(flatten)]
        target: Target,
    },
}
