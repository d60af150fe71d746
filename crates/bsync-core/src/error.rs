//! Error types for bsync-core

use std::path::PathBuf;

/// Result type for bsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The workspace root itself disappeared while syncing
    #[error("Workspace removed: {path}")]
    WorkspaceRemoved { path: PathBuf },

    /// The workspace root exists but is not a directory
    #[error("Workspace root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// The persisted snapshot could not be decoded
    #[error("Corrupt sync index at {path}: {source}")]
    CorruptSnapshot {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A structured data slot holds malformed JSON
    #[error("Invalid JSON in {path}: {source}")]
    InvalidSlotJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A worker already owns the held snapshot
    #[error("Synchronizer is already watching")]
    AlreadyWatching,

    /// An operation needed `init` to have run first
    #[error("Synchronizer is not initialized")]
    NotInitialized,

    /// The background worker ended abnormally
    #[error("Sync worker failed: {message}")]
    Worker { message: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from bsync-fs
    #[error(transparent)]
    Fs(#[from] bsync_fs::Error),

    /// Store error from bsync-store
    #[error(transparent)]
    Store(#[from] bsync_store::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    /// Errors that end the worker instead of being retried on the next tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::WorkspaceRemoved { .. } | Self::NotADirectory { .. })
    }
}
