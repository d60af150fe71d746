//! Store capability traits
//!
//! The engine needs three narrow capabilities. A backend implements each one;
//! [`Store`] is any type that has all three.

use crate::model::{Bucket, VirtualFile};
use crate::Result;

/// Bucket enumeration and removal.
pub trait BucketManager: Send + Sync {
    /// Call `f` for every bucket. Stops at, and returns, the first error.
    fn each_bucket(&self, f: &mut dyn FnMut(&Bucket) -> Result<()>) -> Result<()>;

    /// Create an empty bucket. Existing buckets are left untouched.
    fn create_bucket(&self, name: &str) -> Result<()>;

    /// Remove a bucket and every file in it. Absent buckets are not an error.
    fn delete_bucket(&self, name: &str) -> Result<()>;
}

/// Lookup and mutation of single virtual files.
pub trait FileManager: Send + Sync {
    /// Find a file by key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if no such file exists.
    fn find_file(&self, bucket: &str, name: &str) -> Result<VirtualFile>;

    /// Insert or replace a file, creating its bucket if needed.
    fn put_file(&self, file: VirtualFile) -> Result<()>;

    /// Remove a file. Absent files are not an error.
    fn delete_file(&self, bucket: &str, name: &str) -> Result<()>;

    /// True if the file exists.
    fn has_file(&self, bucket: &str, name: &str) -> Result<bool> {
        match self.find_file(bucket, name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Bulk entry points used when a whole side is copied at bootstrap.
pub trait ImportExport: Send + Sync {
    /// Every file in a bucket, sorted by name.
    fn export_bucket(&self, name: &str) -> Result<Vec<VirtualFile>>;

    /// Upsert many files at once.
    fn import_files(&self, files: Vec<VirtualFile>) -> Result<()>;
}

/// Everything the sync engine needs from a store.
pub trait Store: BucketManager + FileManager + ImportExport {
    /// True if the store enumerates at least one bucket.
    fn has_data(&self) -> Result<bool> {
        let mut count = 0usize;
        self.each_bucket(&mut |_| {
            count += 1;
            Ok(())
        })?;
        Ok(count != 0)
    }

    /// Names of all buckets.
    fn bucket_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        self.each_bucket(&mut |bucket| {
            names.push(bucket.name.clone());
            Ok(())
        })?;
        Ok(names)
    }
}

impl<T: BucketManager + FileManager + ImportExport + ?Sized> Store for T {}
