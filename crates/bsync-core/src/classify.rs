//! Path classification
//!
//! A workspace path is `<bucket>/<file>/<data_name>`. Counting the workspace
//! root as the first segment, its depth decides what a change means:
//!
//! | segments | meaning      | create/modify        | delete               |
//! |----------|--------------|----------------------|----------------------|
//! | 1        | root         | -                    | workspace removed    |
//! | 2        | bucket       | nothing              | delete bucket        |
//! | 3        | virtual file | nothing              | delete virtual file  |
//! | 4        | data slot    | re-import whole file | re-import whole file |

use std::collections::HashSet;
use std::path::Path;

use bsync_fs::WorkspacePath;
use bsync_store::DataSlot;

use crate::diff::ChangeOp;
use crate::{Error, Result};

/// Where a workspace path sits in the bucket/file/slot hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathClass {
    Root,
    Bucket {
        bucket: String,
    },
    VirtualFile {
        bucket: String,
        file: String,
    },
    /// Anything below a virtual-file directory. Deeper paths keep the
    /// remainder as `data_name`.
    DataSlot {
        bucket: String,
        file: String,
        data_name: String,
        slot: DataSlot,
    },
}

impl PathClass {
    /// Segment count including the workspace root.
    pub fn segments(&self) -> usize {
        match self {
            Self::Root => 1,
            Self::Bucket { .. } => 2,
            Self::VirtualFile { .. } => 3,
            Self::DataSlot { .. } => 4,
        }
    }
}

/// Classify a workspace-relative path.
pub fn classify(path: &WorkspacePath) -> PathClass {
    if path.is_root() {
        return PathClass::Root;
    }

    let mut parts = path.as_str().splitn(3, '/');
    let bucket = parts.next().unwrap_or_default().to_string();
    match (parts.next(), parts.next()) {
        (None, _) => PathClass::Bucket { bucket },
        (Some(file), None) => PathClass::VirtualFile {
            bucket,
            file: file.to_string(),
        },
        (Some(file), Some(data_name)) => PathClass::DataSlot {
            bucket,
            file: file.to_string(),
            data_name: data_name.to_string(),
            slot: DataSlot::from_file_name(data_name),
        },
    }
}

/// A store operation derived from one or more changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BridgeAction {
    /// Re-read every slot of the file from disk and overwrite the store copy
    ImportFile { bucket: String, file: String },
    DeleteFile { bucket: String, file: String },
    DeleteBucket { bucket: String },
}

impl std::fmt::Display for BridgeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ImportFile { bucket, file } => write!(f, "import {}/{}", bucket, file),
            Self::DeleteFile { bucket, file } => write!(f, "delete file {}/{}", bucket, file),
            Self::DeleteBucket { bucket } => write!(f, "delete bucket {}", bucket),
        }
    }
}

/// Map a single change to the action it calls for, if any.
///
/// # Errors
///
/// Returns [`Error::WorkspaceRemoved`] when the root itself was deleted.
pub fn action_for(path: &WorkspacePath, is_delete: bool, root: &Path) -> Result<Option<BridgeAction>> {
    let action = match classify(path) {
        PathClass::Root if is_delete => {
            return Err(Error::WorkspaceRemoved {
                path: root.to_path_buf(),
            });
        }
        PathClass::Root => None,
        PathClass::Bucket { bucket } if is_delete => Some(BridgeAction::DeleteBucket { bucket }),
        PathClass::Bucket { .. } => None,
        PathClass::VirtualFile { bucket, file } if is_delete => {
            Some(BridgeAction::DeleteFile { bucket, file })
        }
        PathClass::VirtualFile { .. } => None,
        PathClass::DataSlot { bucket, file, .. } => Some(BridgeAction::ImportFile { bucket, file }),
    };
    Ok(action)
}

/// Fold a diff into the bridge actions it requires.
///
/// Each distinct action appears once, at the position of the first change
/// that asked for it, so a file with three touched slots is imported once.
pub fn plan(changes: &[ChangeOp], root: &Path) -> Result<Vec<BridgeAction>> {
    let mut seen = HashSet::new();
    let mut actions = Vec::new();

    for change in changes {
        match action_for(&change.path, change.kind.is_delete(), root)? {
            Some(action) => {
                if seen.insert(action.clone()) {
                    actions.push(action);
                }
            }
            None => tracing::debug!(change = %change, "Container change, nothing to bridge"),
        }
    }

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn data_slot_path() {
        let class = classify(&"bucket1/file1/meta.json".into());
        assert_eq!(class.segments(), 4);
        assert_eq!(
            class,
            PathClass::DataSlot {
                bucket: "bucket1".to_string(),
                file: "file1".to_string(),
                data_name: "meta.json".to_string(),
                slot: DataSlot::Metadata,
            }
        );
    }

    #[rstest]
    #[case("", 1)]
    #[case("bucket1", 2)]
    #[case("bucket1/file1", 3)]
    #[case("bucket1/file1/script.lua", 4)]
    #[case("bucket1/file1/nested/deeper.bin", 4)]
    fn segment_counts(#[case] path: &str, #[case] segments: usize) {
        assert_eq!(classify(&path.into()).segments(), segments);
    }

    #[test]
    fn deeper_paths_keep_remainder_as_data_name() {
        match classify(&"b/f/nested/x.bin".into()) {
            PathClass::DataSlot { data_name, slot, .. } => {
                assert_eq!(data_name, "nested/x.bin");
                assert_eq!(slot, DataSlot::RawData);
            }
            other => panic!("unexpected class {:?}", other),
        }
    }

    #[test]
    fn root_delete_is_fatal() {
        let result = action_for(&WorkspacePath::root(), true, Path::new("/ws"));
        assert!(matches!(result, Err(Error::WorkspaceRemoved { .. })));
    }

    #[rstest]
    #[case("b", false, None)]
    #[case("b/f", false, None)]
    #[case("b", true, Some(BridgeAction::DeleteBucket { bucket: "b".into() }))]
    #[case("b/f", true, Some(BridgeAction::DeleteFile { bucket: "b".into(), file: "f".into() }))]
    #[case("b/f/meta.json", false, Some(BridgeAction::ImportFile { bucket: "b".into(), file: "f".into() }))]
    #[case("b/f/meta.json", true, Some(BridgeAction::ImportFile { bucket: "b".into(), file: "f".into() }))]
    fn actions_by_depth(
        #[case] path: &str,
        #[case] is_delete: bool,
        #[case] expected: Option<BridgeAction>,
    ) {
        assert_eq!(action_for(&path.into(), is_delete, Path::new("/ws")).unwrap(), expected);
    }

    #[test]
    fn plan_deduplicates_per_file() {
        let changes = vec![
            ChangeOp::new(ChangeKind::CreateDir, "b"),
            ChangeOp::new(ChangeKind::CreateDir, "b/f"),
            ChangeOp::new(ChangeKind::CreateFile, "b/f/meta.json"),
            ChangeOp::new(ChangeKind::CreateFile, "b/f/script.lua"),
            ChangeOp::new(ChangeKind::Modify, "b/g/raw"),
            ChangeOp::new(ChangeKind::DeleteFile, "b/f/structural_data.json"),
        ];

        assert_eq!(
            plan(&changes, Path::new("/ws")).unwrap(),
            vec![
                BridgeAction::ImportFile {
                    bucket: "b".into(),
                    file: "f".into()
                },
                BridgeAction::ImportFile {
                    bucket: "b".into(),
                    file: "g".into()
                },
            ]
        );
    }
}
