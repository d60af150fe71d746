//! Reserved names inside a workspace.

use std::path::Path;

/// File names with a fixed meaning in the workspace tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkspaceName {
    /// `<root>/.sync-index`, the persisted snapshot
    SyncIndex,
    /// Structured data slot of a virtual file
    StructuralData,
    /// Metadata slot of a virtual file
    Meta,
    /// Script slot of a virtual file
    Script,
    /// Name used when exporting the raw data slot
    RawData,
}

impl WorkspaceName {
    /// Get the string representation of the name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SyncIndex => ".sync-index",
            Self::StructuralData => "structural_data.json",
            Self::Meta => "meta.json",
            Self::Script => "script.lua",
            Self::RawData => "raw_data",
        }
    }

    /// True if `name` can be used as one bucket or virtual-file directory
    /// name directly under its parent.
    ///
    /// Rejects the empty name, `.`, `..`, anything containing a path
    /// separator, and the reserved sync index name.
    pub fn is_valid_segment(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && name != Self::SyncIndex.as_str()
    }
}

impl AsRef<Path> for WorkspaceName {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WorkspaceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
