//! Breadcrumb path tracking.
//!
//! The breadcrumb is the ordered path of folders from the root to the
//! currently viewed folder. The root itself is implicit: an empty
//! breadcrumb means the root is in view (depth 0), and rendered crumb
//! lists place the root at index 0 ahead of the tracked crumbs.

use serde::{Deserialize, Serialize};

use sitedock_core::types::id::FolderId;
use sitedock_core::types::parent::ParentRef;

use sitedock_entity::folder::Folder;

/// One entry in the breadcrumb path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    /// The folder in view.
    pub folder_id: FolderId,
    /// Display name at the time of navigation.
    pub name: String,
    /// The folder's depth (top-level folders are depth 1).
    pub depth: i32,
}

/// The navigation path from the root to the current folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    crumbs: Vec<Crumb>,
}

impl Breadcrumb {
    /// A breadcrumb positioned at the root.
    pub fn root() -> Self {
        Self::default()
    }

    /// The tracked crumbs, root excluded.
    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    /// Whether the root is currently in view.
    pub fn at_root(&self) -> bool {
        self.crumbs.is_empty()
    }

    /// The depth of the folder currently in view (root is 0).
    pub fn depth(&self) -> i32 {
        self.crumbs.last().map_or(0, |c| c.depth)
    }

    /// The parent reference new children of the current folder receive.
    pub fn current_parent(&self) -> ParentRef {
        self.crumbs
            .last()
            .map_or(ParentRef::Root, |c| ParentRef::Folder(c.folder_id))
    }

    /// Descend into a folder.
    pub fn descend(&mut self, folder: &Folder) {
        self.crumbs.push(Crumb {
            folder_id: folder.id,
            name: folder.name.clone(),
            depth: folder.depth,
        });
    }

    /// Ascend one level. No-op at the root.
    pub fn ascend(&mut self) {
        self.crumbs.pop();
    }

    /// Jump to a rendered crumb index, where index 0 is the root and
    /// index `n` is the n-th tracked crumb. Everything beyond the target
    /// is discarded.
    pub fn jump_to(&mut self, index: usize) {
        self.crumbs.truncate(index);
    }

    /// Whether a folder created under the current folder would stay
    /// within the depth limit.
    pub fn can_create_folder(&self, max_depth: i32) -> bool {
        self.depth() + 1 <= max_depth
    }
}
