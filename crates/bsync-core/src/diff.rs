//! Snapshot diffing

use bsync_fs::WorkspacePath;

use crate::snapshot::{FileRecord, WorkspaceSnapshot};

/// What happened to a path between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    CreateFile,
    CreateDir,
    Modify,
    DeleteFile,
    DeleteDir,
}

impl ChangeKind {
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::DeleteFile | Self::DeleteDir)
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreateFile => "create",
            Self::CreateDir => "mkdir",
            Self::Modify => "modify",
            Self::DeleteFile => "unlink",
            Self::DeleteDir => "rmdir",
        };
        f.write_str(name)
    }
}

/// One detected change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeOp {
    pub kind: ChangeKind,
    pub path: WorkspacePath,
}

impl ChangeOp {
    pub fn new(kind: ChangeKind, path: impl Into<WorkspacePath>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

impl std::fmt::Display for ChangeOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.path)
    }
}

/// A file counts as modified when size or mtime moved, or when both sides
/// carry a fingerprint and those differ. Directories never do.
fn is_modified(previous: &FileRecord, current: &FileRecord) -> bool {
    if current.is_dir {
        return false;
    }
    let content_changed = match (&previous.hash, &current.hash) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    };
    previous.size != current.size || previous.mod_time != current.mod_time || content_changed
}

/// Compute the changes that turn `previous` into `current`.
///
/// Creates and modifies come first, in path order, followed by deletes in
/// path order. Renames show up as a delete plus a create.
pub fn diff(previous: &WorkspaceSnapshot, current: &WorkspaceSnapshot) -> Vec<ChangeOp> {
    let mut changes = Vec::new();

    for record in current.iter() {
        match previous.get(&record.path) {
            None => {
                let kind = if record.is_dir {
                    ChangeKind::CreateDir
                } else {
                    ChangeKind::CreateFile
                };
                changes.push(ChangeOp::new(kind, record.path.clone()));
            }
            Some(prev) if is_modified(prev, record) => {
                changes.push(ChangeOp::new(ChangeKind::Modify, record.path.clone()));
            }
            Some(_) => {}
        }
    }

    for record in previous.iter() {
        if !current.contains(&record.path) {
            let kind = if record.is_dir {
                ChangeKind::DeleteDir
            } else {
                ChangeKind::DeleteFile
            };
            changes.push(ChangeOp::new(kind, record.path.clone()));
        }
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn base() -> WorkspaceSnapshot {
        WorkspaceSnapshot::from_records([
            FileRecord::dir("b", at(1)),
            FileRecord::dir("b/f", at(1)),
            FileRecord::file("b/f/meta.json", 10, at(1)),
        ])
    }

    #[test]
    fn identical_snapshots_have_no_changes() {
        assert!(diff(&base(), &base()).is_empty());
    }

    #[test]
    fn added_file_is_single_create() {
        let mut current = base();
        current.insert(FileRecord::file("b/f/script.lua", 5, at(2)));

        assert_eq!(
            diff(&base(), &current),
            vec![ChangeOp::new(ChangeKind::CreateFile, "b/f/script.lua")]
        );
    }

    #[test]
    fn added_dir_is_mkdir() {
        let mut current = base();
        current.insert(FileRecord::dir("c", at(2)));

        assert_eq!(
            diff(&base(), &current),
            vec![ChangeOp::new(ChangeKind::CreateDir, "c")]
        );
    }

    #[test]
    fn size_change_is_single_modify() {
        let mut current = base();
        current.insert(FileRecord::file("b/f/meta.json", 11, at(1)));

        assert_eq!(
            diff(&base(), &current),
            vec![ChangeOp::new(ChangeKind::Modify, "b/f/meta.json")]
        );
    }

    #[test]
    fn mtime_change_is_modify() {
        let mut current = base();
        current.insert(FileRecord::file("b/f/meta.json", 10, at(5)));

        assert_eq!(
            diff(&base(), &current),
            vec![ChangeOp::new(ChangeKind::Modify, "b/f/meta.json")]
        );
    }

    #[test]
    fn directory_mtime_change_is_ignored() {
        let mut current = base();
        current.insert(FileRecord::dir("b/f", at(9)));

        assert!(diff(&base(), &current).is_empty());
    }

    #[test]
    fn fingerprint_only_compared_when_both_present() {
        let previous = WorkspaceSnapshot::from_records([FileRecord::file("raw", 1, at(1))]);
        let hashed =
            WorkspaceSnapshot::from_records([FileRecord::file("raw", 1, at(1)).with_hash("sha256:a")]);
        let rehashed =
            WorkspaceSnapshot::from_records([FileRecord::file("raw", 1, at(1)).with_hash("sha256:b")]);

        assert!(diff(&previous, &hashed).is_empty());
        assert_eq!(
            diff(&hashed, &rehashed),
            vec![ChangeOp::new(ChangeKind::Modify, "raw")]
        );
    }

    #[test]
    fn deletes_use_previous_dir_flag_and_come_last() {
        let current = WorkspaceSnapshot::from_records([
            FileRecord::dir("b", at(1)),
            FileRecord::dir("c", at(2)),
        ]);

        assert_eq!(
            diff(&base(), &current),
            vec![
                ChangeOp::new(ChangeKind::CreateDir, "c"),
                ChangeOp::new(ChangeKind::DeleteDir, "b/f"),
                ChangeOp::new(ChangeKind::DeleteFile, "b/f/meta.json"),
            ]
        );
    }

    #[test]
    fn rename_is_delete_plus_create() {
        let previous = WorkspaceSnapshot::from_records([FileRecord::file("b/f/old", 3, at(1))]);
        let current = WorkspaceSnapshot::from_records([FileRecord::file("b/f/new", 3, at(1))]);

        assert_eq!(
            diff(&previous, &current),
            vec![
                ChangeOp::new(ChangeKind::CreateFile, "b/f/new"),
                ChangeOp::new(ChangeKind::DeleteFile, "b/f/old"),
            ]
        );
    }
}
