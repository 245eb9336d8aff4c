//! The deterministic blob store key convention.
//!
//! Layout: `{entityCollection}/{entityId}/{folderId}/{fileName}`, where
//! `{folderId}` is the literal `root` for top-level files. Existing data
//! depends on this exact layout, so it must not change shape.

use sitedock_core::types::entity::EntityRef;
use sitedock_core::types::parent::ParentRef;

/// Derive the blob store key for a file under the given entity and folder.
pub fn storage_path(entity: &EntityRef, parent: &ParentRef, file_name: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        entity.kind.collection_name(),
        entity.id,
        parent.path_segment(),
        file_name
    )
}
