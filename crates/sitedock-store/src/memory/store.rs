//! In-memory record store over the two flat per-entity collections.
//!
//! Records are held in insertion order, ids are store-assigned, and every
//! mutation publishes a fresh [`TreeSnapshot`] to the entity's live
//! subscribers. Deletes are idempotent: removing an absent record reports
//! `false` instead of failing, which is what makes the recursive deletion
//! engine safely retryable.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tracing::debug;

use sitedock_core::AppError;
use sitedock_core::AppResult;
use sitedock_core::types::entity::EntityRef;
use sitedock_core::types::id::{FileId, FolderId};
use sitedock_core::types::parent::ParentRef;
use sitedock_entity::file::model::extension_of;
use sitedock_entity::file::{CreateFile, FileRecord};
use sitedock_entity::folder::{CreateFolder, Folder};
use sitedock_entity::snapshot::TreeSnapshot;

use crate::subscription::{SnapshotSubscription, SubscriberRegistry};

/// The two flat collections for one owning entity.
#[derive(Debug, Default, Clone)]
struct Collections {
    folders: Vec<Folder>,
    files: Vec<FileRecord>,
}

impl Collections {
    fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            folders: self.folders.clone(),
            files: self.files.clone(),
        }
    }
}

/// In-memory metadata record store with live snapshot subscriptions.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    collections: Arc<DashMap<EntityRef, Collections>>,
    registry: Arc<SubscriberRegistry>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to live snapshots of one entity's collections. The
    /// subscription is seeded with the current snapshot and torn down
    /// when dropped.
    pub fn subscribe(&self, entity: EntityRef) -> SnapshotSubscription {
        let initial = self
            .collections
            .get(&entity)
            .map(|c| c.snapshot())
            .unwrap_or_default();
        SubscriberRegistry::subscribe(&self.registry, entity, initial)
    }

    /// The current snapshot of one entity's collections.
    pub async fn snapshot(&self, entity: &EntityRef) -> TreeSnapshot {
        self.collections
            .get(entity)
            .map(|c| c.snapshot())
            .unwrap_or_default()
    }

    /// Number of live subscribers for an entity. Mostly useful in tests.
    pub fn subscriber_count(&self, entity: &EntityRef) -> usize {
        self.registry.subscriber_count(entity)
    }

    fn mutate<T>(
        &self,
        entity: &EntityRef,
        op: impl FnOnce(&mut Collections) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut entry = self.collections.entry(*entity).or_default();
        let result = op(entry.value_mut())?;
        let snapshot = entry.snapshot();
        drop(entry);
        self.registry.publish(entity, &snapshot);
        Ok(result)
    }

    // ----- folders -----

    /// Create a folder record, assigning its id and timestamps.
    pub async fn create_folder(
        &self,
        entity: &EntityRef,
        data: CreateFolder,
    ) -> AppResult<Folder> {
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            name: data.name,
            parent: data.parent,
            depth: data.depth,
            size_bytes: 0,
            created_at: now,
            updated_at: now,
        };
        let created = folder.clone();
        self.mutate(entity, move |c| {
            c.folders.push(folder);
            Ok(())
        })?;
        debug!(entity = %entity, folder_id = %created.id, "Folder record created");
        Ok(created)
    }

    /// Find a folder record by id.
    pub async fn folder(&self, entity: &EntityRef, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self
            .collections
            .get(entity)
            .and_then(|c| c.folders.iter().find(|f| f.id == id).cloned()))
    }

    /// All folder records for the entity, in insertion order.
    pub async fn folders(&self, entity: &EntityRef) -> AppResult<Vec<Folder>> {
        Ok(self
            .collections
            .get(entity)
            .map(|c| c.folders.clone())
            .unwrap_or_default())
    }

    /// Folder records whose parent is `parent`, in insertion order.
    pub async fn folders_with_parent(
        &self,
        entity: &EntityRef,
        parent: ParentRef,
    ) -> AppResult<Vec<Folder>> {
        Ok(self
            .collections
            .get(entity)
            .map(|c| {
                c.folders
                    .iter()
                    .filter(|f| f.parent == parent)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Rename a folder record, bumping `updated_at`.
    pub async fn rename_folder(
        &self,
        entity: &EntityRef,
        id: FolderId,
        new_name: &str,
    ) -> AppResult<Folder> {
        self.mutate(entity, |c| {
            let folder = c
                .folders
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| AppError::not_found("Folder not found"))?;
            folder.name = new_name.to_string();
            folder.updated_at = Utc::now();
            Ok(folder.clone())
        })
    }

    /// Delete a folder record. Returns `false` when it was already gone.
    pub async fn delete_folder(&self, entity: &EntityRef, id: FolderId) -> AppResult<bool> {
        self.mutate(entity, |c| {
            let before = c.folders.len();
            c.folders.retain(|f| f.id != id);
            Ok(c.folders.len() < before)
        })
    }

    // ----- files -----

    /// Create a file record, assigning its id, extension, and timestamps.
    pub async fn create_file(&self, entity: &EntityRef, data: CreateFile) -> AppResult<FileRecord> {
        let now = Utc::now();
        let file = FileRecord {
            id: FileId::new(),
            extension: extension_of(&data.name),
            name: data.name,
            size_bytes: data.size_bytes,
            parent: data.parent,
            storage_path: data.storage_path,
            download_url: data.download_url,
            depth: data.depth,
            created_at: now,
            updated_at: now,
        };
        let created = file.clone();
        self.mutate(entity, move |c| {
            c.files.push(file);
            Ok(())
        })?;
        debug!(entity = %entity, file_id = %created.id, "File record created");
        Ok(created)
    }

    /// Find a file record by id.
    pub async fn file(&self, entity: &EntityRef, id: FileId) -> AppResult<Option<FileRecord>> {
        Ok(self
            .collections
            .get(entity)
            .and_then(|c| c.files.iter().find(|f| f.id == id).cloned()))
    }

    /// All file records for the entity, in insertion order.
    pub async fn files(&self, entity: &EntityRef) -> AppResult<Vec<FileRecord>> {
        Ok(self
            .collections
            .get(entity)
            .map(|c| c.files.clone())
            .unwrap_or_default())
    }

    /// File records whose parent is `parent`, in insertion order.
    pub async fn files_with_parent(
        &self,
        entity: &EntityRef,
        parent: ParentRef,
    ) -> AppResult<Vec<FileRecord>> {
        Ok(self
            .collections
            .get(entity)
            .map(|c| {
                c.files
                    .iter()
                    .filter(|f| f.parent == parent)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Rename a file record, refreshing the extension and `updated_at`.
    pub async fn rename_file(
        &self,
        entity: &EntityRef,
        id: FileId,
        new_name: &str,
    ) -> AppResult<FileRecord> {
        self.mutate(entity, |c| {
            let file = c
                .files
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| AppError::not_found("File not found"))?;
            file.name = new_name.to_string();
            file.extension = extension_of(new_name);
            file.updated_at = Utc::now();
            Ok(file.clone())
        })
    }

    /// Delete a file record. Returns `false` when it was already gone.
    pub async fn delete_file(&self, entity: &EntityRef, id: FileId) -> AppResult<bool> {
        self.mutate(entity, |c| {
            let before = c.files.len();
            c.files.retain(|f| f.id != id);
            Ok(c.files.len() < before)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitedock_core::types::entity::EntityKind;
    use sitedock_core::types::id::EntityId;

    fn project() -> EntityRef {
        EntityRef::new(EntityKind::Project, EntityId::new())
    }

    fn create_folder(name: &str, parent: ParentRef, depth: i32) -> CreateFolder {
        CreateFolder {
            name: name.to_string(),
            parent,
            depth,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_folder() {
        let store = MemoryRecordStore::new();
        let entity = project();

        let folder = store
            .create_folder(&entity, create_folder("Docs", ParentRef::Root, 1))
            .await
            .unwrap();

        let found = store.folder(&entity, folder.id).await.unwrap();
        assert_eq!(found.unwrap().name, "Docs");

        let roots = store
            .folders_with_parent(&entity, ParentRef::Root)
            .await
            .unwrap();
        assert_eq!(roots.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_folder_is_idempotent() {
        let store = MemoryRecordStore::new();
        let entity = project();

        let folder = store
            .create_folder(&entity, create_folder("Docs", ParentRef::Root, 1))
            .await
            .unwrap();

        assert!(store.delete_folder(&entity, folder.id).await.unwrap());
        assert!(!store.delete_folder(&entity, folder.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_bumps_updated_at() {
        let store = MemoryRecordStore::new();
        let entity = project();

        let folder = store
            .create_folder(&entity, create_folder("Docs", ParentRef::Root, 1))
            .await
            .unwrap();
        let renamed = store
            .rename_folder(&entity, folder.id, "Documents")
            .await
            .unwrap();

        assert_eq!(renamed.name, "Documents");
        assert!(renamed.updated_at >= folder.updated_at);
    }

    #[tokio::test]
    async fn test_subscription_sees_changes_and_tears_down() {
        let store = MemoryRecordStore::new();
        let entity = project();

        let mut sub = store.subscribe(entity);
        assert!(sub.latest().is_empty());
        assert_eq!(store.subscriber_count(&entity), 1);

        store
            .create_folder(&entity, create_folder("Docs", ParentRef::Root, 1))
            .await
            .unwrap();

        let snapshot = sub.changed().await.unwrap();
        assert_eq!(snapshot.folders.len(), 1);
        assert_eq!(snapshot.folders[0].name, "Docs");

        drop(sub);
        assert_eq!(store.subscriber_count(&entity), 0);
    }

    #[tokio::test]
    async fn test_entities_are_isolated() {
        let store = MemoryRecordStore::new();
        let a = project();
        let b = EntityRef::new(EntityKind::Warranty, EntityId::new());

        store
            .create_folder(&a, create_folder("Docs", ParentRef::Root, 1))
            .await
            .unwrap();

        assert_eq!(store.folders(&a).await.unwrap().len(), 1);
        assert!(store.folders(&b).await.unwrap().is_empty());
    }
}
