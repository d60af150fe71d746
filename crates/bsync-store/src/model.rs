//! Virtual-file data model

use bsync_fs::WorkspaceName;
use serde::{Deserialize, Serialize};

/// Structured slot payload: a JSON object.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// One of the four typed slots a virtual file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSlot {
    RawData,
    Script,
    Metadata,
    StructuralData,
}

impl DataSlot {
    pub const ALL: [DataSlot; 4] = [
        DataSlot::RawData,
        DataSlot::Script,
        DataSlot::Metadata,
        DataSlot::StructuralData,
    ];

    /// Slot stored in a data file called `name`. Unknown names hold raw data.
    pub fn from_file_name(name: &str) -> Self {
        if name == WorkspaceName::Script.as_str() {
            Self::Script
        } else if name == WorkspaceName::Meta.as_str() {
            Self::Metadata
        } else if name == WorkspaceName::StructuralData.as_str() {
            Self::StructuralData
        } else {
            Self::RawData
        }
    }

    /// File name this slot is exported under.
    pub fn file_name(&self) -> WorkspaceName {
        match self {
            Self::RawData => WorkspaceName::RawData,
            Self::Script => WorkspaceName::Script,
            Self::Metadata => WorkspaceName::Meta,
            Self::StructuralData => WorkspaceName::StructuralData,
        }
    }
}

impl std::fmt::Display for DataSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RawData => "raw_data",
            Self::Script => "script",
            Self::Metadata => "metadata",
            Self::StructuralData => "structural_data",
        };
        f.write_str(name)
    }
}

/// A named record inside a bucket.
///
/// All four slots are written together; a store never patches one slot of an
/// existing file in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualFile {
    pub bucket: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural_data: Option<JsonMap>,
}

impl VirtualFile {
    /// Create a file with every slot empty.
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_raw_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.raw_data = Some(data.into());
        self
    }

    pub fn with_script(mut self, script: impl Into<Vec<u8>>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonMap) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_structural_data(mut self, data: JsonMap) -> Self {
        self.structural_data = Some(data);
        self
    }

    /// True if `slot` holds a value.
    pub fn has_slot(&self, slot: DataSlot) -> bool {
        match slot {
            DataSlot::RawData => self.raw_data.is_some(),
            DataSlot::Script => self.script.is_some(),
            DataSlot::Metadata => self.metadata.is_some(),
            DataSlot::StructuralData => self.structural_data.is_some(),
        }
    }

    /// Slots holding a value, in [`DataSlot::ALL`] order.
    pub fn populated_slots(&self) -> Vec<DataSlot> {
        DataSlot::ALL
            .into_iter()
            .filter(|slot| self.has_slot(*slot))
            .collect()
    }
}

/// A named collection of virtual files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    pub name: String,
    /// Names of the files in this bucket, sorted
    pub files: Vec<String>,
}
