//! Recursive deletion across the record store and blob store.
//!
//! A folder delete removes every descendant file's blob and record, then
//! descendant folders, then the folder itself — depth-first, children
//! before parent, so no orphaned file record ever outlives its owning
//! folder's record.
//!
//! The sequence is not one atomic transaction. A crash mid-way leaves a
//! partially deleted subtree; because every individual delete (blob and
//! record) is idempotent, re-invoking the delete on the same folder id
//! finishes the job.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::info;

use sitedock_core::AppError;
use sitedock_core::AppResult;
use sitedock_core::config::tree::TreeConfig;
use sitedock_core::events::AttachmentEvent;
use sitedock_core::traits::blob_store::BlobStore;
use sitedock_core::types::entity::EntityRef;
use sitedock_core::types::id::{FileId, FolderId};
use sitedock_core::types::identity::Identity;
use sitedock_core::types::parent::ParentRef;

use sitedock_entity::file::FileRecord;
use sitedock_store::MemoryRecordStore;

use crate::context::RequestContext;
use crate::outbox::Outbox;

/// Deletes files and folders, with everything beneath them.
#[derive(Debug, Clone)]
pub struct DeletionEngine {
    /// Metadata record store.
    store: Arc<MemoryRecordStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
    /// Best-effort side effects.
    outbox: Outbox,
    /// Tree limits.
    config: TreeConfig,
}

impl DeletionEngine {
    /// Creates a new deletion engine.
    pub fn new(
        store: Arc<MemoryRecordStore>,
        blobs: Arc<dyn BlobStore>,
        outbox: Outbox,
        config: TreeConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            outbox,
            config,
        }
    }

    /// Delete a single file: blob first (missing blob is fine), then the
    /// metadata record.
    pub async fn delete_file(
        &self,
        ctx: &RequestContext,
        entity: &EntityRef,
        file_id: FileId,
    ) -> AppResult<()> {
        let record = self
            .store
            .file(entity, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.delete_file_record(entity, &record, &ctx.identity).await?;

        info!(
            user_id = %ctx.user_id(),
            entity = %entity,
            file_id = %file_id,
            name = %record.name,
            "File deleted"
        );
        Ok(())
    }

    /// Delete a folder and everything beneath it.
    ///
    /// Invoking this again on the same id — including after a partial
    /// failure, or once the folder record itself is already gone — is
    /// safe and completes whatever remains.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        entity: &EntityRef,
        folder_id: FolderId,
    ) -> AppResult<()> {
        let mut visited = HashSet::new();
        let mut remaining = self.config.max_traversal_nodes;
        self.delete_subtree(entity, folder_id, &ctx.identity, &mut visited, &mut remaining)
            .await?;

        info!(
            user_id = %ctx.user_id(),
            entity = %entity,
            folder_id = %folder_id,
            folders_removed = visited.len(),
            "Folder deleted recursively"
        );
        Ok(())
    }

    /// Depth-first removal of one subtree: files of the folder, then
    /// child folders recursively, then the folder's own record.
    fn delete_subtree<'a>(
        &'a self,
        entity: &'a EntityRef,
        folder_id: FolderId,
        actor: &'a Identity,
        visited: &'a mut HashSet<FolderId>,
        remaining: &'a mut usize,
    ) -> BoxFuture<'a, AppResult<()>> {
        Box::pin(async move {
            if !visited.insert(folder_id) {
                return Err(AppError::validation(
                    "Folder tree contains a cycle; aborting delete",
                ));
            }
            Self::spend_traversal_budget(remaining)?;

            // Fetch the record up front; a retry after a partial failure
            // may find it already gone, which changes nothing below.
            let folder = self.store.folder(entity, folder_id).await?;
            let parent = ParentRef::Folder(folder_id);

            for file in self.store.files_with_parent(entity, parent).await? {
                Self::spend_traversal_budget(remaining)?;
                self.delete_file_record(entity, &file, actor).await?;
            }

            for child in self.store.folders_with_parent(entity, parent).await? {
                self.delete_subtree(entity, child.id, actor, visited, remaining)
                    .await?;
            }

            self.store.delete_folder(entity, folder_id).await?;

            if let Some(folder) = folder {
                self.outbox
                    .record_activity(
                        entity,
                        Some(actor.user_id),
                        AttachmentEvent::FolderDeleted {
                            folder_id,
                            name: folder.name,
                        },
                    )
                    .await;
            }
            Ok(())
        })
    }

    /// Remove one file's blob (best-effort on absence) and record, then
    /// emit the delete notification and activity entry.
    async fn delete_file_record(
        &self,
        entity: &EntityRef,
        record: &FileRecord,
        actor: &Identity,
    ) -> AppResult<()> {
        // Idempotent: an already-deleted blob is not an error.
        self.blobs.delete(&record.storage_path).await?;
        self.store.delete_file(entity, record.id).await?;

        self.outbox
            .attachment_deleted(entity, actor, &record.name)
            .await;
        self.outbox
            .record_activity(
                entity,
                Some(actor.user_id),
                AttachmentEvent::FileDeleted {
                    file_id: record.id,
                    name: record.name.clone(),
                },
            )
            .await;

        Ok(())
    }

    fn spend_traversal_budget(remaining: &mut usize) -> AppResult<()> {
        if *remaining == 0 {
            return Err(AppError::validation(
                "Delete traversal exceeded the node limit; aborting",
            ));
        }
        *remaining -= 1;
        Ok(())
    }
}
