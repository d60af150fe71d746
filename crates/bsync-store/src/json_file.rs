//! Store persisted as a single JSON document

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use bsync_fs::io;

use crate::memory::{MemoryStore, Tree};
use crate::model::{Bucket, VirtualFile};
use crate::traits::{BucketManager, FileManager, ImportExport};
use crate::{Error, Result};

/// A [`MemoryStore`] that rewrites its backing JSON file after every mutation.
///
/// Writes go through [`io::write_atomic`], so a crash leaves either the old
/// or the new document on disk.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    mem: MemoryStore,
    /// Serializes mutate-then-flush so the file never lags a newer state.
    flush_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tree: Tree = if path.exists() {
            let content = io::read_bytes(&path)?;
            if content.is_empty() {
                Tree::new()
            } else {
                serde_json::from_slice(&content)?
            }
        } else {
            Tree::new()
        };
        tracing::debug!(path = %path.display(), buckets = tree.len(), "opened json store");

        Ok(Self {
            path,
            mem: MemoryStore::from_tree(tree),
            flush_lock: Mutex::new(()),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a staged copy, persist it, then publish it.
    ///
    /// Readers keep seeing the previous tree until the document is on disk;
    /// a failed write leaves both memory and disk unchanged.
    fn mutate(&self, f: impl FnOnce(&MemoryStore) -> Result<()>) -> Result<()> {
        let _guard = self.flush_lock.lock().map_err(|_| Error::LockPoisoned)?;
        let staged = MemoryStore::from_tree(self.mem.clone_tree()?);
        f(&staged)?;
        io::write_atomic(&self.path, &staged.to_json()?)?;
        self.mem.replace_tree(staged.into_tree()?)
    }
}

impl BucketManager for JsonFileStore {
    fn each_bucket(&self, f: &mut dyn FnMut(&Bucket) -> Result<()>) -> Result<()> {
        self.mem.each_bucket(f)
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        self.mutate(|mem| mem.create_bucket(name))
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.mutate(|mem| mem.delete_bucket(name))
    }
}

impl FileManager for JsonFileStore {
    fn find_file(&self, bucket: &str, name: &str) -> Result<VirtualFile> {
        self.mem.find_file(bucket, name)
    }

    fn put_file(&self, file: VirtualFile) -> Result<()> {
        self.mutate(|mem| mem.put_file(file))
    }

    fn delete_file(&self, bucket: &str, name: &str) -> Result<()> {
        self.mutate(|mem| mem.delete_file(bucket, name))
    }
}

impl ImportExport for JsonFileStore {
    fn export_bucket(&self, name: &str) -> Result<Vec<VirtualFile>> {
        self.mem.export_bucket(name)
    }

    fn import_files(&self, files: Vec<VirtualFile>) -> Result<()> {
        self.mutate(|mem| mem.import_files(files))
    }
}
