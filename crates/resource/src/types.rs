//! Resource model for file-count reconciliation.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Namespaced identity of one file-count resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    /// Namespace the resource lives in.
    pub namespace: String,
    /// Name of the resource within its namespace.
    pub name: String,
}

impl ResourceId {
    /// Create a new resource identity.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Desired state: the directory to watch and the file count to enforce.
///
/// Immutable from the engine's perspective; only an external actor changes
/// it, and every change triggers a reconcile pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCountSpec {
    /// Filesystem path of the reconciled directory.
    pub directory_path: PathBuf,
    /// Target number of non-directory entries.
    pub max_files: u64,
}

impl FileCountSpec {
    /// Create a new spec.
    pub fn new(directory_path: impl Into<PathBuf>, max_files: u64) -> Self {
        Self {
            directory_path: directory_path.into(),
            max_files,
        }
    }

    /// Check the spec is usable: the directory path must be non-empty.
    pub fn is_valid(&self) -> bool {
        !self.directory_path.as_os_str().is_empty()
    }
}

/// Observed state: the last count the engine measured and recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCountStatus {
    /// Last measured non-directory entry count.
    pub num_files: u64,
}

/// A persisted file-count resource: identity, desired spec, observed status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCount {
    /// Namespaced identity.
    pub id: ResourceId,
    /// Desired state.
    pub spec: FileCountSpec,
    /// Observed state.
    pub status: FileCountStatus,
}

impl FileCount {
    /// Create a resource with an empty observation, as a freshly created
    /// object has not been measured yet.
    pub fn new(id: ResourceId, spec: FileCountSpec) -> Self {
        Self {
            id,
            spec,
            status: FileCountStatus::default(),
        }
    }
}
