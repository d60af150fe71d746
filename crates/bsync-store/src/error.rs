//! Error types for bsync-store

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No virtual file with this key
    #[error("File not found: {bucket}/{file}")]
    NotFound { bucket: String, file: String },

    /// A store lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,

    /// Backend-specific failure
    #[error("Store backend error: {message}")]
    Backend { message: String },

    /// Filesystem error from bsync-fs
    #[error(transparent)]
    Fs(#[from] bsync_fs::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(bucket: &str, file: &str) -> Self {
        Self::NotFound {
            bucket: bucket.to_string(),
            file: file.to_string(),
        }
    }

    /// True for a missing file, as opposed to a failing store.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
