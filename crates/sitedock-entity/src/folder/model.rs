//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitedock_core::types::id::FolderId;
use sitedock_core::types::parent::ParentRef;

/// A folder in an entity's attachment tree.
///
/// The tree root itself is never stored; top-level folders have
/// `parent == ParentRef::Root` and `depth == 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier, assigned by the record store.
    pub id: FolderId,
    /// Folder name (user-editable, never empty).
    pub name: String,
    /// Parent folder, or the root sentinel.
    pub parent: ParentRef,
    /// Depth in the tree; always exactly one greater than the parent's.
    pub depth: i32,
    /// Informational byte count. Not recomputed on every file mutation.
    pub size_bytes: i64,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Whether this folder sits directly under the root.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_root()
    }
}

/// Data required to create a new folder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (root sentinel for top-level folders).
    pub parent: ParentRef,
    /// Depth in the tree.
    pub depth: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitedock_core::types::parent::ParentRef;

    #[test]
    fn test_top_level_detection() {
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            name: "Contracts".to_string(),
            parent: ParentRef::Root,
            depth: 1,
            size_bytes: 0,
            created_at: now,
            updated_at: now,
        };
        assert!(folder.is_top_level());

        let nested = Folder {
            parent: ParentRef::Folder(folder.id),
            depth: 2,
            ..folder.clone()
        };
        assert!(!nested.is_top_level());
    }
}
