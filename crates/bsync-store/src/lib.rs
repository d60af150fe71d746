//! Virtual-file store for bucketsync
//!
//! The sync engine only talks to a store through the capability traits in
//! [`traits`]. Two implementations ship here:
//!
//! - [`MemoryStore`]: a process-local tree of buckets and files
//! - [`JsonFileStore`]: the same tree persisted to one JSON document
//!
//! ```text
//! Bucket ──owns──> VirtualFile ──owns──> { RawData, Script, Metadata, StructuralData }
//! ```

pub mod error;
pub mod json_file;
pub mod memory;
pub mod model;
pub mod traits;

pub use error::{Error, Result};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use model::{Bucket, DataSlot, JsonMap, VirtualFile};
pub use traits::{BucketManager, FileManager, ImportExport, Store};
