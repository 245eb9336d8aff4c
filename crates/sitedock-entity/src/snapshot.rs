//! Flat tree snapshots pushed by the record store subscription.

use serde::{Deserialize, Serialize};

use sitedock_core::types::id::FolderId;
use sitedock_core::types::parent::ParentRef;

use crate::file::FileRecord;
use crate::folder::Folder;

/// The full flat Folder/File collections for one entity at one point in
/// time. The namespace tree views are reconstructed from this; the
/// snapshot itself carries no hierarchy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// All folder records, in store insertion order.
    pub folders: Vec<Folder>,
    /// All file records, in store insertion order.
    pub files: Vec<FileRecord>,
}

impl TreeSnapshot {
    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a folder record by id.
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Folders whose parent is `parent`, in insertion order.
    pub fn folders_under(&self, parent: ParentRef) -> Vec<&Folder> {
        self.folders.iter().filter(|f| f.parent == parent).collect()
    }

    /// Files whose parent is `parent`, in insertion order.
    pub fn files_under(&self, parent: ParentRef) -> Vec<&FileRecord> {
        self.files.iter().filter(|f| f.parent == parent).collect()
    }

    /// Total number of records in the snapshot.
    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    /// Whether the snapshot holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }
}
