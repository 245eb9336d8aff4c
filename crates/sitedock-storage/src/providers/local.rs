//! Local filesystem blob store provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use sitedock_core::error::{AppError, ErrorKind};
use sitedock_core::result::AppResult;
use sitedock_core::traits::blob_store::{
    BlobStore, ResumableTransfer, TransferOutcome, TransferProgress,
};

/// Local filesystem blob store.
///
/// Objects are addressed by their storage path relative to the root
/// directory. Resumable writes go through a `.part` staging file that is
/// renamed into place on completion, so readers never observe a
/// half-written object.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
    /// Chunk size for resumable writes.
    chunk_size: usize,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str, chunk_size_bytes: u64) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            chunk_size: chunk_size_bytes.max(1) as usize,
        })
    }

    /// Resolve a storage path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn put_resumable(&self, path: &str, data: Bytes) -> AppResult<ResumableTransfer> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        let part_path = full_path.with_extension(match full_path.extension() {
            Some(ext) => format!("{}.part", ext.to_string_lossy()),
            None => "part".to_string(),
        });

        let total = data.len() as u64;
        let (progress_tx, progress_rx) = watch::channel(TransferProgress::start(total));
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let chunk_size = self.chunk_size;
        let display_path = path.to_string();

        let task = tokio::spawn(async move {
            let result = write_chunks(
                &part_path,
                &full_path,
                &data,
                chunk_size,
                &progress_tx,
                &token,
            )
            .await;

            match result {
                Ok(outcome) => {
                    if matches!(outcome, TransferOutcome::Cancelled) {
                        debug!(path = %display_path, "Resumable transfer cancelled");
                    } else {
                        debug!(path = %display_path, bytes = total, "Resumable transfer completed");
                    }
                    Ok(outcome)
                }
                Err(e) => {
                    // Leave no partial object behind on failure.
                    let _ = fs::remove_file(&part_path).await;
                    Err(e)
                }
            }
        });

        Ok(ResumableTransfer::new(progress_rx, cancel, task))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn read_url(&self, url: &str) -> AppResult<Bytes> {
        let prefix = format!("file://{}/", self.root.display());
        let path = url.strip_prefix(&prefix).ok_or_else(|| {
            AppError::storage(format!("Retrieval URL outside this blob root: {url}"))
        })?;
        self.read_bytes(path).await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted blob");
                Ok(())
            }
            // Deleting an absent object is not an error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.resolve(path).exists())
    }

    fn url_for(&self, path: &str) -> String {
        format!("file://{}/{}", self.root.display(), path.trim_start_matches('/'))
    }
}

/// Write `data` to `part_path` chunk by chunk, then rename into place.
/// Checks the cancel token between chunks; a cancelled transfer removes
/// the staging file and reports [`TransferOutcome::Cancelled`].
async fn write_chunks(
    part_path: &Path,
    final_path: &Path,
    data: &Bytes,
    chunk_size: usize,
    progress: &watch::Sender<TransferProgress>,
    cancel: &CancellationToken,
) -> AppResult<TransferOutcome> {
    let total = data.len() as u64;
    let mut file = fs::File::create(part_path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Transfer,
            format!("Failed to create staging file: {}", part_path.display()),
            e,
        )
    })?;

    let mut written = 0u64;
    for chunk in data.chunks(chunk_size) {
        if cancel.is_cancelled() {
            drop(file);
            let _ = fs::remove_file(part_path).await;
            return Ok(TransferOutcome::Cancelled);
        }

        file.write_all(chunk)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Transfer, "Failed to write chunk", e))?;
        written += chunk.len() as u64;
        let _ = progress.send(TransferProgress {
            bytes_transferred: written,
            total_bytes: total,
        });
    }

    file.flush()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Transfer, "Failed to flush staging file", e))?;
    drop(file);

    fs::rename(part_path, final_path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Transfer,
            format!("Failed to finalize blob: {}", final_path.display()),
            e,
        )
    })?;

    // Zero-byte objects never enter the chunk loop; report completion here.
    let _ = progress.send(TransferProgress {
        bytes_transferred: total,
        total_bytes: total,
    });

    Ok(TransferOutcome::Completed {
        bytes_written: total,
    })
}
