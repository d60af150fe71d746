//! Workspace directory fixtures.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Creates an empty temporary workspace root.
///
/// # Panics
/// Panics if the temporary directory cannot be created.
pub fn empty_workspace() -> TempDir {
    TempDir::new().unwrap_or_else(|e| panic!("empty_workspace: failed to create temp dir: {e}"))
}

/// Writes `content` to `<root>/<relative>`, creating parent directories.
///
/// `relative` uses forward slashes, e.g. `"bucket1/file1/meta.json"`.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn write_slot(root: &Path, relative: &str, content: impl AsRef<[u8]>) {
    let path = relative.split('/').fold(root.to_path_buf(), |acc, s| acc.join(s));
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("write_slot: failed to create {}: {e}", parent.display()));
    }
    fs::write(&path, content)
        .unwrap_or_else(|e| panic!("write_slot: failed to write {}: {e}", path.display()));
}

/// Reads `<root>/<relative>` as UTF-8.
///
/// # Panics
/// Panics if the file is missing or not UTF-8.
pub fn read_slot(root: &Path, relative: &str) -> String {
    let path = relative.split('/').fold(root.to_path_buf(), |acc, s| acc.join(s));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read_slot: failed to read {}: {e}", path.display()))
}

/// Creates a temporary workspace holding the given `(path, content)` entries.
///
/// Use for: bridge, bootstrap and sync-pass tests that start from a known
/// tree. Paths ending in `/` create an empty directory instead of a file.
///
/// # Example
///
/// ```rust
/// use bsync_test_utils::workspace_with;
///
/// let ws = workspace_with(&[
///     ("bucket1/file1/meta.json", "{\"k\": 1}"),
///     ("bucket2/", ""),
/// ]);
/// assert!(ws.path().join("bucket1/file1/meta.json").is_file());
/// assert!(ws.path().join("bucket2").is_dir());
/// ```
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn workspace_with(entries: &[(&str, &str)]) -> TempDir {
    let dir = empty_workspace();
    for (relative, content) in entries {
        if let Some(dir_path) = relative.strip_suffix('/') {
            let path = dir_path.split('/').fold(dir.path().to_path_buf(), |acc, s| acc.join(s));
            fs::create_dir_all(&path)
                .unwrap_or_else(|e| panic!("workspace_with: failed to create {}: {e}", path.display()));
        } else {
            write_slot(dir.path(), relative, content);
        }
    }
    dir
}
