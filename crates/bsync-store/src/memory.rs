//! In-memory store

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{Bucket, VirtualFile};
use crate::traits::{BucketManager, FileManager, ImportExport};
use crate::{Error, Result};

/// Bucket name -> file name -> file.
pub(crate) type Tree = BTreeMap<String, BTreeMap<String, VirtualFile>>;

/// A store holding every bucket in process memory.
///
/// Buckets own their files; a (bucket, file) lookup is two map reads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tree: RwLock<Tree>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_tree(tree: Tree) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tree>> {
        self.tree.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tree>> {
        self.tree.write().map_err(|_| Error::LockPoisoned)
    }

    /// Copy of the current tree.
    pub(crate) fn clone_tree(&self) -> Result<Tree> {
        Ok(self.read()?.clone())
    }

    /// Swap in a new tree wholesale.
    pub(crate) fn replace_tree(&self, tree: Tree) -> Result<()> {
        *self.write()? = tree;
        Ok(())
    }

    pub(crate) fn into_tree(self) -> Result<Tree> {
        self.tree.into_inner().map_err(|_| Error::LockPoisoned)
    }

    /// Serialize the whole tree as pretty JSON.
    pub(crate) fn to_json(&self) -> Result<Vec<u8>> {
        let tree = self.read()?;
        Ok(serde_json::to_vec_pretty(&*tree)?)
    }

    /// Number of files across all buckets.
    pub fn file_count(&self) -> Result<usize> {
        Ok(self.read()?.values().map(BTreeMap::len).sum())
    }
}

impl BucketManager for MemoryStore {
    fn each_bucket(&self, f: &mut dyn FnMut(&Bucket) -> Result<()>) -> Result<()> {
        // Collect first so the callback may call back into the store.
        let buckets: Vec<Bucket> = self
            .read()?
            .iter()
            .map(|(name, files)| Bucket {
                name: name.clone(),
                files: files.keys().cloned().collect(),
            })
            .collect();

        for bucket in &buckets {
            f(bucket)?;
        }
        Ok(())
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        self.write()?.entry(name.to_string()).or_default();
        Ok(())
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.write()?.remove(name);
        Ok(())
    }
}

impl FileManager for MemoryStore {
    fn find_file(&self, bucket: &str, name: &str) -> Result<VirtualFile> {
        self.read()?
            .get(bucket)
            .and_then(|files| files.get(name))
            .cloned()
            .ok_or_else(|| Error::not_found(bucket, name))
    }

    fn put_file(&self, file: VirtualFile) -> Result<()> {
        self.write()?
            .entry(file.bucket.clone())
            .or_default()
            .insert(file.name.clone(), file);
        Ok(())
    }

    fn delete_file(&self, bucket: &str, name: &str) -> Result<()> {
        if let Some(files) = self.write()?.get_mut(bucket) {
            files.remove(name);
        }
        Ok(())
    }
}

impl ImportExport for MemoryStore {
    fn export_bucket(&self, name: &str) -> Result<Vec<VirtualFile>> {
        Ok(self
            .read()?
            .get(name)
            .map(|files| files.values().cloned().collect())
            .unwrap_or_default())
    }

    fn import_files(&self, files: Vec<VirtualFile>) -> Result<()> {
        let mut tree = self.write()?;
        for file in files {
            tree.entry(file.bucket.clone())
                .or_default()
                .insert(file.name.clone(), file);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Store;

    #[test]
    fn put_then_find() {
        let store = MemoryStore::new();
        let file = VirtualFile::new("b", "f").with_script(b"return 1".to_vec());
        store.put_file(file.clone()).unwrap();
        assert_eq!(store.find_file("b", "f").unwrap(), file);
    }

    #[test]
    fn missing_file_is_not_found() {
        let store = MemoryStore::new();
        assert!(store.find_file("b", "f").unwrap_err().is_not_found());
        assert!(!store.has_file("b", "f").unwrap());
    }

    #[test]
    fn deletes_are_idempotent() {
        let store = MemoryStore::new();
        store.delete_file("b", "f").unwrap();
        store.delete_bucket("b").unwrap();
        assert!(!store.has_data().unwrap());
    }

    #[test]
    fn delete_file_keeps_bucket() {
        let store = MemoryStore::new();
        store.put_file(VirtualFile::new("b", "f")).unwrap();
        store.delete_file("b", "f").unwrap();
        assert_eq!(store.bucket_names().unwrap(), vec!["b".to_string()]);
        assert_eq!(store.file_count().unwrap(), 0);
    }

    #[test]
    fn each_bucket_short_circuits() {
        let store = MemoryStore::new();
        store.create_bucket("a").unwrap();
        store.create_bucket("b").unwrap();

        let mut seen = 0;
        let result = store.each_bucket(&mut |_| {
            seen += 1;
            Err(Error::Backend {
                message: "stop".to_string(),
            })
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }
}
