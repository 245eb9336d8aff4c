//! Folder CRUD operations with depth enforcement.

use std::sync::Arc;

use tracing::info;

use sitedock_core::AppError;
use sitedock_core::config::tree::TreeConfig;
use sitedock_core::events::AttachmentEvent;
use sitedock_core::types::entity::EntityRef;
use sitedock_core::types::id::{FileId, FolderId};
use sitedock_core::types::parent::ParentRef;

use sitedock_entity::file::FileRecord;
use sitedock_entity::folder::{CreateFolder, Folder};
use sitedock_store::MemoryRecordStore;

use crate::context::RequestContext;
use crate::outbox::Outbox;
use crate::tree::Breadcrumb;

/// Manages folder creation and rename operations.
///
/// The depth limit is enforced here, before any store call is made:
/// a creation request at the maximum depth never reaches the store.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Metadata record store.
    store: Arc<MemoryRecordStore>,
    /// Best-effort side effects.
    outbox: Outbox,
    /// Tree limits.
    config: TreeConfig,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<MemoryRecordStore>, outbox: Outbox, config: TreeConfig) -> Self {
        Self {
            store,
            outbox,
            config,
        }
    }

    /// Creates a new folder under the breadcrumb's current position.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        entity: &EntityRef,
        at: &Breadcrumb,
        name: &str,
    ) -> Result<Folder, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        if !at.can_create_folder(self.config.max_folder_depth) {
            return Err(AppError::depth_limit(format!(
                "Folders cannot be nested more than {} levels deep",
                self.config.max_folder_depth
            )));
        }

        let parent = at.current_parent();
        if let ParentRef::Folder(parent_id) = parent {
            self.store
                .folder(entity, parent_id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
        }

        let folder = self
            .store
            .create_folder(
                entity,
                CreateFolder {
                    name: name.to_string(),
                    parent,
                    depth: at.depth() + 1,
                },
            )
            .await?;

        info!(
            user_id = %ctx.user_id(),
            entity = %entity,
            folder_id = %folder.id,
            depth = folder.depth,
            "Folder created"
        );

        self.outbox
            .record_activity(
                entity,
                Some(ctx.user_id()),
                AttachmentEvent::FolderCreated {
                    folder_id: folder.id,
                    name: folder.name.clone(),
                    depth: folder.depth,
                },
            )
            .await;

        Ok(folder)
    }

    /// Renames a folder. Name-only mutation; children are unaffected.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        entity: &EntityRef,
        folder_id: FolderId,
        new_name: &str,
    ) -> Result<Folder, AppError> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let existing = self
            .store
            .folder(entity, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let folder = self.store.rename_folder(entity, folder_id, new_name).await?;

        info!(
            user_id = %ctx.user_id(),
            entity = %entity,
            folder_id = %folder_id,
            new_name = %new_name,
            "Folder renamed"
        );

        self.outbox
            .record_activity(
                entity,
                Some(ctx.user_id()),
                AttachmentEvent::FolderRenamed {
                    folder_id,
                    old_name: existing.name,
                    new_name: folder.name.clone(),
                },
            )
            .await;

        Ok(folder)
    }

    /// Renames a file record.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        entity: &EntityRef,
        file_id: FileId,
        new_name: &str,
    ) -> Result<FileRecord, AppError> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        let existing = self
            .store
            .file(entity, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let file = self.store.rename_file(entity, file_id, new_name).await?;

        info!(
            user_id = %ctx.user_id(),
            entity = %entity,
            file_id = %file_id,
            new_name = %new_name,
            "File renamed"
        );

        self.outbox
            .record_activity(
                entity,
                Some(ctx.user_id()),
                AttachmentEvent::FileRenamed {
                    file_id,
                    old_name: existing.name,
                    new_name: file.name.clone(),
                },
            )
            .await;

        Ok(file)
    }
}
