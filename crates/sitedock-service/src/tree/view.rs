//! Pure tree reconstruction over a pushed snapshot.
//!
//! The record store pushes flat collections; this view answers
//! "children of the current folder" without touching the store, so the
//! reconstruction is side-effect-free and independently testable.

use std::collections::HashSet;

use sitedock_core::AppError;
use sitedock_core::AppResult;
use sitedock_core::config::tree::TreeConfig;
use sitedock_core::types::id::FolderId;
use sitedock_core::types::parent::ParentRef;

use sitedock_entity::file::FileRecord;
use sitedock_entity::folder::Folder;
use sitedock_entity::snapshot::TreeSnapshot;

/// A point-in-time view of one entity's attachment tree.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    snapshot: TreeSnapshot,
}

impl TreeView {
    /// Build a view over a snapshot.
    pub fn new(snapshot: TreeSnapshot) -> Self {
        Self { snapshot }
    }

    /// The underlying snapshot.
    pub fn snapshot(&self) -> &TreeSnapshot {
        &self.snapshot
    }

    /// Look up a folder record by id.
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.snapshot.folder(id)
    }

    /// Children of the given parent: folders and files, each in store
    /// insertion order.
    pub fn children_of(&self, parent: ParentRef) -> (Vec<&Folder>, Vec<&FileRecord>) {
        (
            self.snapshot.folders_under(parent),
            self.snapshot.files_under(parent),
        )
    }

    /// Verify the structural invariants of the snapshot: every folder's
    /// depth is exactly one greater than its parent's (root is depth 0),
    /// every parent reference resolves, no parent chain revisits a folder,
    /// and the tree stays within the traversal budget.
    ///
    /// Data predating the depth invariant can violate these; traversing
    /// engines fail loudly instead of hanging on such trees.
    pub fn validate(&self, config: &TreeConfig) -> AppResult<()> {
        if self.snapshot.len() > config.max_traversal_nodes {
            return Err(AppError::validation(format!(
                "Attachment tree exceeds {} records",
                config.max_traversal_nodes
            )));
        }

        for folder in &self.snapshot.folders {
            let expected_parent_depth = folder.depth - 1;
            match folder.parent {
                ParentRef::Root => {
                    if folder.depth != 1 {
                        return Err(AppError::validation(format!(
                            "Top-level folder '{}' has depth {}, expected 1",
                            folder.name, folder.depth
                        )));
                    }
                }
                ParentRef::Folder(parent_id) => {
                    let parent = self.snapshot.folder(parent_id).ok_or_else(|| {
                        AppError::validation(format!(
                            "Folder '{}' references missing parent {parent_id}",
                            folder.name
                        ))
                    })?;
                    if parent.depth != expected_parent_depth {
                        return Err(AppError::validation(format!(
                            "Folder '{}' has depth {} under a parent of depth {}",
                            folder.name, folder.depth, parent.depth
                        )));
                    }
                }
            }
            self.check_ancestry(folder)?;
        }

        Ok(())
    }

    /// Follow one folder's parent chain to the root, rejecting cycles.
    fn check_ancestry(&self, folder: &Folder) -> AppResult<()> {
        let mut seen: HashSet<FolderId> = HashSet::from([folder.id]);
        let mut current = folder.parent;

        while let ParentRef::Folder(parent_id) = current {
            if !seen.insert(parent_id) {
                return Err(AppError::validation(format!(
                    "Folder '{}' sits on a cyclic parent chain",
                    folder.name
                )));
            }
            current = match self.snapshot.folder(parent_id) {
                Some(parent) => parent.parent,
                // A missing ancestor is reported by `validate`.
                None => break,
            };
        }

        Ok(())
    }
}
