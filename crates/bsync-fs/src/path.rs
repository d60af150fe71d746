//! Workspace-relative path handling
//!
//! Every path the engine reasons about is relative to the workspace root and
//! stored with forward slashes, whatever the host platform uses.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path relative to the workspace root, normalized to forward slashes.
///
/// Empty and `.` segments are dropped, so `./a//b/` and `a/b` compare equal.
/// The empty path denotes the workspace root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct WorkspacePath {
    inner: String,
}

impl WorkspacePath {
    /// Create a normalized relative path from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::normalize(&path.as_ref().to_string_lossy())
    }

    fn normalize(raw: &str) -> Self {
        let inner = raw
            .replace('\\', "/")
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self { inner }
    }

    /// The workspace root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Express `path` relative to `root`.
    ///
    /// Relative inputs are taken as already relative to the root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutsideWorkspace`] when an absolute `path` does not
    /// live under `root`, or when the path climbs out through a `..`
    /// segment.
    pub fn relative_to(root: &Path, path: &Path) -> Result<Self> {
        let outside = || Error::OutsideWorkspace {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        };

        let relative = if path.is_relative() {
            Self::new(path)
        } else {
            path.strip_prefix(root).map(Self::new).map_err(|_| outside())?
        };
        if relative.segments().any(|s| s == "..") {
            return Err(outside());
        }
        Ok(relative)
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for the workspace root.
    pub fn is_root(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over the path segments below the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|s| !s.is_empty())
    }

    /// Number of segments below the root (0 for the root).
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.is_root() {
            Self::normalize(segment)
        } else {
            Self::normalize(&format!("{}/{}", self.inner, segment))
        }
    }

    /// Get the parent path, `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(match self.inner.rfind('/') {
            Some(idx) => Self {
                inner: self.inner[..idx].to_string(),
            },
            None => Self::root(),
        })
    }

    /// Get the last segment.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Resolve against `root` into a platform-native path for I/O.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, s| acc.join(s))
    }
}

impl std::fmt::Display for WorkspacePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for WorkspacePath {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<String> for WorkspacePath {
    fn from(s: String) -> Self {
        Self::normalize(&s)
    }
}

impl From<WorkspacePath> for String {
    fn from(p: WorkspacePath) -> Self {
        p.inner
    }
}

impl AsRef<str> for WorkspacePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}
