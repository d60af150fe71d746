//! Filesystem primitives for bucketsync
//!
//! Provides workspace-relative path handling, atomic writes and content
//! fingerprints shared by the store and the sync engine.

pub mod checksum;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use constants::WorkspaceName;
pub use error::{Error, Result};
pub use path::WorkspacePath;
