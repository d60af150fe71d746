//! Workspace snapshots
//!
//! A snapshot maps every workspace-relative path to what was observed there
//! at one instant. The last synchronized snapshot is persisted as
//! `<root>/.sync-index` and reloaded on the next start.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use bsync_fs::{WorkspaceName, WorkspacePath, checksum, io};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Attributes observed for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: WorkspacePath,
    /// Byte size; always 0 for directories
    pub size: u64,
    pub mod_time: DateTime<Utc>,
    /// Content fingerprint, only populated when fingerprinting is enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub is_dir: bool,
}

impl FileRecord {
    pub fn file(path: impl Into<WorkspacePath>, size: u64, mod_time: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size,
            mod_time,
            hash: None,
            is_dir: false,
        }
    }

    pub fn dir(path: impl Into<WorkspacePath>, mod_time: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            mod_time,
            hash: None,
            is_dir: true,
        }
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }
}

/// How a snapshot is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotOptions {
    /// Compute a SHA-256 fingerprint for every file
    pub fingerprint: bool,
}

/// Full observed state of a workspace, keyed by relative path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceSnapshot {
    records: BTreeMap<WorkspacePath, FileRecord>,
}

impl WorkspaceSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from records, keyed by each record's path.
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.path.clone(), r)).collect(),
        }
    }

    /// Add or replace one record.
    pub fn insert(&mut self, record: FileRecord) {
        self.records.insert(record.path.clone(), record);
    }

    pub fn get(&self, path: &WorkspacePath) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn contains(&self, path: &WorkspacePath) -> bool {
        self.records.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in path order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values()
    }

    /// Walk `root` and record every entry except the sync index.
    ///
    /// Entries that cannot be inspected (a dangling symlink, a permission
    /// error, a name that is not UTF-8) are logged and left out rather than
    /// failing the walk.
    ///
    /// # Errors
    ///
    /// Returns an error if the root itself cannot be read.
    pub fn build(root: &Path, options: SnapshotOptions) -> Result<Self> {
        let meta = fs::metadata(root).map_err(|e| bsync_fs::Error::io(root, e))?;
        if !meta.is_dir() {
            return Err(Error::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let mut snapshot = Self::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() != 1 || !is_index_name(&entry.file_name().to_string_lossy()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable workspace entry");
                    continue;
                }
            };

            if entry.path().strip_prefix(root).ok().and_then(Path::to_str).is_none() {
                tracing::warn!(path = %entry.path().display(), "Skipping entry with a non UTF-8 name");
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %entry.path().display(), error = %e, "Skipping entry without metadata");
                    continue;
                }
            };

            let path = WorkspacePath::relative_to(root, entry.path())?;
            let mod_time = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_default();

            let record = if metadata.is_dir() {
                FileRecord::dir(path, mod_time)
            } else {
                let mut record = FileRecord::file(path, metadata.len(), mod_time);
                if options.fingerprint && metadata.is_file() {
                    match checksum::compute_file_checksum(entry.path()) {
                        Ok(hash) => record.hash = Some(hash),
                        Err(e) => tracing::warn!(error = %e, "Could not fingerprint file"),
                    }
                }
                record
            };
            snapshot.insert(record);
        }

        tracing::debug!(root = %root.display(), entries = snapshot.len(), "Built workspace snapshot");
        Ok(snapshot)
    }

    /// Write the snapshot as two-space indented JSON.
    pub fn encode<W: Write>(&self, writer: W) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// Read a snapshot written by [`encode`](Self::encode).
    pub fn decode<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptSnapshot`] if the file is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        let content = io::read_bytes(path)?;
        serde_json::from_slice(&content).map_err(|source| Error::CorruptSnapshot {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Persist the snapshot atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = Vec::new();
        self.encode(&mut content)?;
        content.push(b'\n');
        io::write_atomic(path, &content)?;
        Ok(())
    }
}

/// Location of the persisted snapshot for a workspace.
pub fn index_path(root: &Path) -> std::path::PathBuf {
    root.join(WorkspaceName::SyncIndex)
}

/// True for the sync index and the temp files written while saving it.
pub fn is_index_name(name: &str) -> bool {
    let index = WorkspaceName::SyncIndex.as_str();
    name == index || io::is_temp_of(index, name)
}
