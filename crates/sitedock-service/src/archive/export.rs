//! Archive export — single-file download and recursive folder zip.
//!
//! Read-only over the tree: no metadata is mutated here. Folder export
//! fetches every reachable file's blob independently and skips members
//! whose fetch fails; a failed member never aborts the whole archive.

use std::collections::{HashSet, VecDeque};
use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use sitedock_core::AppError;
use sitedock_core::AppResult;
use sitedock_core::config::tree::TreeConfig;
use sitedock_core::error::ErrorKind;
use sitedock_core::events::AttachmentEvent;
use sitedock_core::traits::blob_store::BlobStore;
use sitedock_core::types::entity::EntityRef;
use sitedock_core::types::id::{FileId, FolderId};
use sitedock_core::types::parent::ParentRef;

use sitedock_entity::file::FileRecord;
use sitedock_store::MemoryRecordStore;

use crate::context::RequestContext;
use crate::outbox::Outbox;

/// A downloadable blob with its presentation name.
#[derive(Debug, Clone)]
pub struct NamedBlob {
    /// The name to present to the user (file name or `{folder}.zip`).
    pub name: String,
    /// The content.
    pub bytes: Bytes,
}

/// Produces downloadable bundles from the attachment tree.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    /// Metadata record store.
    store: Arc<MemoryRecordStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
    /// Best-effort side effects.
    outbox: Outbox,
    /// Tree limits.
    config: TreeConfig,
}

impl ArchiveService {
    /// Creates a new archive service.
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

    /// Download a single file's content.
    pub async fn download_file(
        &self,
        ctx: &RequestContext,
        entity: &EntityRef,
        file_id: FileId,
    ) -> AppResult<NamedBlob> {
        let record = self
            .store
            .file(entity, file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let bytes = self.fetch_record_bytes(&record).await?;

        info!(
            user_id = %ctx.user_id(),
            entity = %entity,
            file_id = %file_id,
            name = %record.name,
            "File downloaded"
        );

        Ok(NamedBlob {
            name: record.name,
            bytes,
        })
    }

    /// Export a folder and all files transitively beneath it as one zip
    /// archive named after the folder.
    pub async fn export_folder(
        &self,
        ctx: &RequestContext,
        entity: &EntityRef,
        folder_id: FolderId,
    ) -> AppResult<NamedBlob> {
        let folder = self
            .store
            .folder(entity, folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;

        let records = self.collect_descendant_files(entity, folder_id).await?;

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            match self.fetch_record_bytes(&record).await {
                Ok(bytes) => entries.push((record.name, bytes)),
                Err(e) => {
                    // Best-effort membership: skip what cannot be fetched.
                    warn!(
                        entity = %entity,
                        file_id = %record.id,
                        name = %record.name,
                        error = %e,
                        "Skipping archive member with unreadable blob"
                    );
                }
            }
        }

        let entry_count = entries.len();
        let archive = tokio::task::spawn_blocking(move || build_zip(entries))
            .await
            .map_err(|e| AppError::internal(format!("Archive task panicked: {e}")))??;

        let archive_name = format!("{}.zip", folder.name);

        info!(
            user_id = %ctx.user_id(),
            entity = %entity,
            folder_id = %folder_id,
            entries = entry_count,
            "Folder exported as archive"
        );

        self.outbox
            .record_activity(
                entity,
                Some(ctx.user_id()),
                AttachmentEvent::FolderArchived {
                    folder_id,
                    archive_name: archive_name.clone(),
                    entry_count,
                },
            )
            .await;

        Ok(NamedBlob {
            name: archive_name,
            bytes: Bytes::from(archive),
        })
    }

    /// Every file record reachable from the folder through any chain of
    /// parent links, regardless of depth. Traversal is bounded and
    /// cycle-checked so corrupted trees fail loudly instead of hanging.
    async fn collect_descendant_files(
        &self,
        entity: &EntityRef,
        folder_id: FolderId,
    ) -> AppResult<Vec<FileRecord>> {
        let mut queue = VecDeque::from([folder_id]);
        let mut visited: HashSet<FolderId> = HashSet::new();
        let mut remaining = self.config.max_traversal_nodes;
        let mut files = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                return Err(AppError::validation(
                    "Folder tree contains a cycle; aborting export",
                ));
            }
            if remaining == 0 {
                return Err(AppError::validation(
                    "Export traversal exceeded the node limit; aborting",
                ));
            }
            remaining -= 1;

            let parent = ParentRef::Folder(current);
            files.extend(self.store.files_with_parent(entity, parent).await?);
            for child in self.store.folders_with_parent(entity, parent).await? {
                queue.push_back(child.id);
            }
        }

        Ok(files)
    }

    /// Fetch a record's content: by storage path when present, else by
    /// the cached retrieval URL. A record with neither is not
    /// downloadable.
    async fn fetch_record_bytes(&self, record: &FileRecord) -> AppResult<Bytes> {
        if !record.storage_path.is_empty() {
            return self.blobs.read_bytes(&record.storage_path).await;
        }
        if let Some(url) = &record.download_url {
            return self.blobs.read_url(url).await;
        }
        Err(AppError::not_downloadable(format!(
            "File '{}' has neither a retrieval URL nor a storage path",
            record.name
        )))
    }
}

/// Assemble the archive on a blocking thread.
fn build_zip(entries: Vec<(String, Bytes)>) -> AppResult<Vec<u8>> {
    use std::io::Cursor;

    use zip::CompressionMethod;
    use zip::write::{SimpleFileOptions, ZipWriter};

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to start archive entry", e))?;
        writer
            .write_all(&data)
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to write archive entry", e))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to finalize archive", e))?;

    Ok(cursor.into_inner())
}
