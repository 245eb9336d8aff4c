//! The upload pipeline — sequential resumable transfers with per-file
//! progress and cancellation, one whole-object fallback per file, and
//! metadata commit after each successful transfer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sitedock_core::config::storage::StorageConfig;
use sitedock_core::error::{AppError, ErrorKind};
use sitedock_core::events::AttachmentEvent;
use sitedock_core::traits::blob_store::{BlobStore, TransferOutcome};
use sitedock_core::traits::identity::IdentityProvider;
use sitedock_core::types::entity::EntityRef;
use sitedock_core::types::identity::Identity;
use sitedock_core::types::parent::ParentRef;

use sitedock_entity::file::{CreateFile, FileRecord};
use sitedock_storage::path::storage_path;
use sitedock_store::MemoryRecordStore;

use crate::outbox::Outbox;
use crate::upload::batch::{PendingFile, select_files};

/// Where a batch lands: one folder (or the root) of one entity's tree.
#[derive(Debug, Clone, Copy)]
pub struct UploadTarget {
    /// The owning entity.
    pub entity: EntityRef,
    /// The destination folder, or the root sentinel.
    pub parent: ParentRef,
    /// The destination folder's depth (0 for the root).
    pub depth: i32,
}

/// Progress and lifecycle events for one running batch.
///
/// The `index` is the file's position within the batch. The event channel
/// closes when `upload_batch` returns, which clears any pending progress
/// state on the consumer side.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// A file's transfer started. `cancel` aborts this transfer only;
    /// sibling transfers in the batch are unaffected.
    Started {
        /// Position within the batch.
        index: usize,
        /// The file name.
        name: String,
        /// Cancel handle for this transfer.
        cancel: CancellationToken,
    },
    /// Transfer progress for a file.
    Progress {
        /// Position within the batch.
        index: usize,
        /// The file name.
        name: String,
        /// Completion percentage in `0.0..=100.0`.
        percent: f64,
    },
    /// A file's metadata record was committed.
    Committed {
        /// Position within the batch.
        index: usize,
        /// The committed record.
        file: FileRecord,
    },
    /// A file's transfer was deliberately cancelled. Only this file is
    /// skipped; the batch continues with the next one.
    Cancelled {
        /// Position within the batch.
        index: usize,
        /// The file name.
        name: String,
    },
    /// A file failed irrecoverably; the batch aborts after this event.
    Failed {
        /// Position within the batch.
        index: usize,
        /// The file name.
        name: String,
        /// The failure message.
        message: String,
    },
}

/// Handles upload batches into one entity's attachment tree.
#[derive(Debug, Clone)]
pub struct UploadService {
    /// Metadata record store.
    store: Arc<MemoryRecordStore>,
    /// Blob store.
    blobs: Arc<dyn BlobStore>,
    /// Identity provider; an identity must be established before any
    /// blob write.
    identity: Arc<dyn IdentityProvider>,
    /// Best-effort side effects.
    outbox: Outbox,
    /// Storage configuration.
    config: StorageConfig,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        store: Arc<MemoryRecordStore>,
        blobs: Arc<dyn BlobStore>,
        identity: Arc<dyn IdentityProvider>,
        outbox: Outbox,
        config: StorageConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            identity,
            outbox,
            config,
        }
    }

    /// Apply the selection-time size filter to a picked set of files.
    /// Oversized files are silently dropped, not errors.
    pub fn select_files(&self, picked: impl IntoIterator<Item = PendingFile>) -> Vec<PendingFile> {
        select_files(picked, self.config.max_upload_size_bytes)
    }

    /// Upload a batch of files into the target folder.
    ///
    /// Files are processed strictly sequentially. The first irrecoverable
    /// failure aborts the remaining files; records committed before it
    /// stay committed. Independent batches may run concurrently with no
    /// coordination between them.
    pub async fn upload_batch(
        &self,
        target: &UploadTarget,
        batch: Vec<PendingFile>,
        events: Option<mpsc::UnboundedSender<UploadEvent>>,
    ) -> Result<Vec<FileRecord>, AppError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        // Identity must be established before the first transfer starts.
        let identity = match self.identity.current_identity() {
            Some(identity) => identity,
            None => self.identity.ensure_signed_in().await?,
        };

        let mut committed = Vec::with_capacity(batch.len());
        for (index, file) in batch.into_iter().enumerate() {
            match self.upload_one(target, &identity, index, &file, &events).await {
                Ok(Some(record)) => {
                    emit(
                        &events,
                        UploadEvent::Committed {
                            index,
                            file: record.clone(),
                        },
                    );
                    committed.push(record);
                }
                // A deliberate cancel skips this file only.
                Ok(None) => {
                    emit(
                        &events,
                        UploadEvent::Cancelled {
                            index,
                            name: file.name.clone(),
                        },
                    );
                    info!(
                        entity = %target.entity,
                        name = %file.name,
                        "Upload cancelled, continuing with remaining files"
                    );
                }
                Err(e) => {
                    emit(
                        &events,
                        UploadEvent::Failed {
                            index,
                            name: file.name.clone(),
                            message: e.message.clone(),
                        },
                    );
                    warn!(
                        entity = %target.entity,
                        name = %file.name,
                        committed = committed.len(),
                        error = %e,
                        "Upload batch aborted"
                    );
                    return Err(e);
                }
            }
        }

        info!(
            entity = %target.entity,
            count = committed.len(),
            "Upload batch completed"
        );
        Ok(committed)
    }

    /// Transfer one file and commit its metadata record. Returns `None`
    /// when the transfer was deliberately cancelled.
    async fn upload_one(
        &self,
        target: &UploadTarget,
        identity: &Identity,
        index: usize,
        file: &PendingFile,
        events: &Option<mpsc::UnboundedSender<UploadEvent>>,
    ) -> Result<Option<FileRecord>, AppError> {
        let path = storage_path(&target.entity, &target.parent, &file.name);

        match self.resumable_attempt(&path, file, index, events).await {
            Ok(TransferOutcome::Completed { .. }) => {}
            // Not a transport failure: no fallback, no record.
            Ok(TransferOutcome::Cancelled) => return Ok(None),
            Err(e) => {
                // One fallback attempt via a whole-object put, for
                // transport failures only — a cancel never lands here.
                warn!(
                    name = %file.name,
                    error = %e,
                    "Resumable transfer failed, retrying with whole-object put"
                );
                self.blobs.put(&path, file.data.clone()).await.map_err(|fe| {
                    AppError::with_source(
                        ErrorKind::Transfer,
                        format!("Upload of '{}' failed after fallback", file.name),
                        fe,
                    )
                })?;
            }
        }

        let download_url = self.blobs.url_for(&path);
        let record = self
            .store
            .create_file(
                &target.entity,
                CreateFile {
                    name: file.name.clone(),
                    size_bytes: file.data.len() as i64,
                    parent: target.parent,
                    storage_path: path,
                    download_url: Some(download_url),
                    depth: target.depth,
                },
            )
            .await?;

        info!(
            entity = %target.entity,
            file_id = %record.id,
            name = %record.name,
            size = record.size_bytes,
            "Upload committed"
        );

        self.outbox
            .attachment_added(&target.entity, identity, &record.name)
            .await;
        self.outbox
            .record_activity(
                &target.entity,
                Some(identity.user_id),
                AttachmentEvent::FileUploaded {
                    file_id: record.id,
                    name: record.name.clone(),
                    size_bytes: record.size_bytes,
                },
            )
            .await;

        Ok(Some(record))
    }

    /// Run one resumable transfer, forwarding its progress stream and
    /// exposing its cancel handle through the event channel.
    async fn resumable_attempt(
        &self,
        path: &str,
        file: &PendingFile,
        index: usize,
        events: &Option<mpsc::UnboundedSender<UploadEvent>>,
    ) -> Result<TransferOutcome, AppError> {
        let transfer = self.blobs.put_resumable(path, file.data.clone()).await?;

        emit(
            events,
            UploadEvent::Started {
                index,
                name: file.name.clone(),
                cancel: transfer.cancel_token(),
            },
        );

        if let Some(tx) = events.clone() {
            let mut progress = transfer.progress();
            let name = file.name.clone();
            // Ends on its own once the transfer task drops its sender.
            tokio::spawn(async move {
                while progress.changed().await.is_ok() {
                    let percent = progress.borrow_and_update().percent();
                    if tx
                        .send(UploadEvent::Progress {
                            index,
                            name: name.clone(),
                            percent,
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            });
        }

        transfer.wait().await
    }
}

fn emit(events: &Option<mpsc::UnboundedSender<UploadEvent>>, event: UploadEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}
