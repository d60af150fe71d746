//! SHA-256 content fingerprints
//!
//! Fingerprints use the canonical `sha256:<hex>` format. They back the
//! optional content comparison in snapshots.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::{Error, Result};

/// Prefix for all fingerprints produced by this module
const PREFIX: &str = "sha256:";

/// Compute the fingerprint of an in-memory buffer.
pub fn compute_bytes_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the fingerprint of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(compute_bytes_checksum(&content))
}
