//! Data bridge between the workspace tree and the store
//!
//! On disk a virtual file is a directory of slot files:
//!
//! ```text
//! <root>/<bucket>/<file>/structural_data.json   StructuralData (JSON object)
//! <root>/<bucket>/<file>/meta.json              Metadata (JSON object)
//! <root>/<bucket>/<file>/script.lua             Script
//! <root>/<bucket>/<file>/<anything else>        RawData
//! ```
//!
//! Slots are never patched one at a time: every import re-reads the whole
//! directory and overwrites all four slots in the store.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bsync_fs::{WorkspaceName, io};
use bsync_store::{BucketManager, DataSlot, FileManager, ImportExport, JsonMap, Store, VirtualFile};
use serde::{Deserialize, Serialize};

use crate::classify::BridgeAction;
use crate::snapshot::is_index_name;
use crate::{Error, Result};

/// Summary of a bulk import or export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    pub buckets: usize,
    pub files: usize,
    /// Per-file failures that did not stop the transfer
    pub errors: Vec<String>,
}

/// Moves virtual files between a workspace root and a store.
#[derive(Clone)]
pub struct DataBridge {
    root: PathBuf,
    store: Arc<dyn Store>,
}

impl std::fmt::Debug for DataBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataBridge").field("root", &self.root).finish()
    }
}

impl DataBridge {
    pub fn new(root: impl Into<PathBuf>, store: Arc<dyn Store>) -> Self {
        Self {
            root: root.into(),
            store,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Run one planned action.
    pub fn apply(&self, action: &BridgeAction) -> Result<()> {
        tracing::debug!(%action, "Applying bridge action");
        match action {
            BridgeAction::ImportFile { bucket, file } => self.import_virtual_file(bucket, file),
            BridgeAction::DeleteFile { bucket, file } => self.delete_virtual_file(bucket, file),
            BridgeAction::DeleteBucket { bucket } => self.delete_bucket(bucket),
        }
    }

    fn file_dir(&self, bucket: &str, file: &str) -> PathBuf {
        self.root.join(bucket).join(file)
    }

    /// Read a virtual file from its directory.
    ///
    /// Returns `None` if the directory does not exist. When several data
    /// files map to raw data, the first by name wins.
    ///
    /// # Errors
    ///
    /// Returns an error if a slot file cannot be read or a structured slot
    /// does not hold a JSON object.
    pub fn read_virtual_file(&self, bucket: &str, file: &str) -> Result<Option<VirtualFile>> {
        let dir = self.file_dir(bucket, file);
        if !dir.is_dir() {
            return Ok(None);
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&dir)
            .map_err(|e| bsync_fs::Error::io(&dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        entries.sort();

        let mut vfile = VirtualFile::new(bucket, file);
        for path in entries {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let slot = DataSlot::from_file_name(&name);

            if vfile.has_slot(slot) {
                tracing::warn!(path = %path.display(), %slot, "Slot already filled, ignoring extra data file");
                continue;
            }

            let data = io::read_bytes(&path)?;
            set_slot(&mut vfile, slot, data, &path)?;
        }

        Ok(Some(vfile))
    }

    /// Re-import every slot of one virtual file, replacing the store copy.
    ///
    /// A virtual file whose directory is gone is deleted from the store.
    pub fn import_virtual_file(&self, bucket: &str, file: &str) -> Result<()> {
        match self.read_virtual_file(bucket, file)? {
            Some(vfile) => {
                tracing::debug!(bucket, file, slots = ?vfile.populated_slots(), "Importing virtual file");
                self.store.put_file(vfile)?;
            }
            None => {
                tracing::debug!(bucket, file, "Virtual file directory gone, deleting from store");
                self.store.delete_file(bucket, file)?;
            }
        }
        Ok(())
    }

    /// Remove a virtual file from the store. Absent files are fine.
    pub fn delete_virtual_file(&self, bucket: &str, file: &str) -> Result<()> {
        self.store.delete_file(bucket, file)?;
        Ok(())
    }

    /// Remove a bucket and its files from the store. Absent buckets are fine.
    pub fn delete_bucket(&self, bucket: &str) -> Result<()> {
        self.store.delete_bucket(bucket)?;
        Ok(())
    }

    /// Write every bucket, file and populated slot into the workspace.
    pub fn export_all(&self) -> Result<TransferReport> {
        let mut report = TransferReport::default();

        for bucket in self.store.bucket_names()? {
            if !WorkspaceName::is_valid_segment(&bucket) {
                tracing::warn!(%bucket, "Bucket name is not a valid directory name, skipping");
                report.errors.push(format!("{}: invalid bucket name", bucket));
                continue;
            }
            io::ensure_dir(&self.root.join(&bucket))?;
            report.buckets += 1;

            for vfile in self.store.export_bucket(&bucket)? {
                if !WorkspaceName::is_valid_segment(&vfile.name) {
                    tracing::warn!(%bucket, file = %vfile.name, "File name is not a valid directory name, skipping");
                    report.errors.push(format!("{}/{}: invalid file name", bucket, vfile.name));
                    continue;
                }
                self.write_virtual_file(&vfile)?;
                report.files += 1;
            }
        }

        tracing::info!(buckets = report.buckets, files = report.files, "Exported store to workspace");
        Ok(report)
    }

    fn write_virtual_file(&self, vfile: &VirtualFile) -> Result<()> {
        let dir = self.file_dir(&vfile.bucket, &vfile.name);
        io::ensure_dir(&dir)?;

        for slot in vfile.populated_slots() {
            if let Some(bytes) = slot_bytes(vfile, slot)? {
                io::write_atomic(&dir.join(slot.file_name()), &bytes)?;
            }
        }
        Ok(())
    }

    /// Make the store mirror the workspace.
    ///
    /// Every virtual-file directory is read and the results are written in
    /// one batch; buckets and files the store holds without a directory on
    /// disk are removed. A file that fails to read is recorded in the report
    /// and the rest continue.
    pub fn import_workspace(&self) -> Result<TransferReport> {
        let mut report = TransferReport::default();
        let mut on_disk: Vec<(String, Vec<String>)> = Vec::new();
        let mut batch = Vec::new();

        for bucket in subdirectories(&self.root)? {
            if is_index_name(&bucket) {
                continue;
            }
            self.store.create_bucket(&bucket)?;
            report.buckets += 1;

            let files = subdirectories(&self.root.join(&bucket))?;
            for file in &files {
                match self.read_virtual_file(&bucket, file) {
                    Ok(Some(vfile)) => batch.push(vfile),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(bucket = %bucket, file = %file, error = %e, "Import failed");
                        report.errors.push(format!("{}/{}: {}", bucket, file, e));
                    }
                }
            }
            on_disk.push((bucket, files));
        }

        report.files = batch.len();
        self.store.import_files(batch)?;

        let mut stale_files = Vec::new();
        let mut stale_buckets = Vec::new();
        self.store.each_bucket(&mut |bucket| {
            match on_disk.iter().find(|(name, _)| *name == bucket.name) {
                None => stale_buckets.push(bucket.name.clone()),
                Some((_, files)) => {
                    for file in &bucket.files {
                        if !files.contains(file) {
                            stale_files.push((bucket.name.clone(), file.clone()));
                        }
                    }
                }
            }
            Ok(())
        })?;

        for bucket in stale_buckets {
            tracing::debug!(%bucket, "Removing bucket absent from workspace");
            self.store.delete_bucket(&bucket)?;
        }
        for (bucket, file) in stale_files {
            tracing::debug!(%bucket, %file, "Removing file absent from workspace");
            self.store.delete_file(&bucket, &file)?;
        }

        tracing::info!(
            buckets = report.buckets,
            files = report.files,
            errors = report.errors.len(),
            "Imported workspace into store"
        );
        Ok(report)
    }
}

/// Decode a slot file's content into `vfile`.
fn set_slot(vfile: &mut VirtualFile, slot: DataSlot, data: Vec<u8>, path: &Path) -> Result<()> {
    match slot {
        DataSlot::RawData => vfile.raw_data = Some(data),
        DataSlot::Script => vfile.script = Some(data),
        DataSlot::Metadata => vfile.metadata = Some(parse_object(&data, path)?),
        DataSlot::StructuralData => vfile.structural_data = Some(parse_object(&data, path)?),
    }
    Ok(())
}

/// An empty file is an empty object.
fn parse_object(data: &[u8], path: &Path) -> Result<JsonMap> {
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonMap::new());
    }
    serde_json::from_slice(data).map_err(|source| Error::InvalidSlotJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode a slot for writing to disk.
fn slot_bytes(vfile: &VirtualFile, slot: DataSlot) -> Result<Option<Vec<u8>>> {
    let bytes = match slot {
        DataSlot::RawData => vfile.raw_data.clone(),
        DataSlot::Script => vfile.script.clone(),
        DataSlot::Metadata => vfile.metadata.as_ref().map(serde_json::to_vec_pretty).transpose()?,
        DataSlot::StructuralData => vfile
            .structural_data
            .as_ref()
            .map(serde_json::to_vec_pretty)
            .transpose()?,
    };
    Ok(bytes)
}

/// Names of the directories directly inside `dir`, sorted.
fn subdirectories(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| bsync_fs::Error::io(dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    Ok(names)
}
