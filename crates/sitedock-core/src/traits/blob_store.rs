//! Blob store trait for pluggable object storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::result::AppResult;

/// Progress of an in-flight resumable transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransferProgress {
    /// Bytes written so far.
    pub bytes_transferred: u64,
    /// Total bytes in the object.
    pub total_bytes: u64,
}

impl TransferProgress {
    /// A fresh progress value at zero bytes.
    pub fn start(total_bytes: u64) -> Self {
        Self {
            bytes_transferred: 0,
            total_bytes,
        }
    }

    /// Completion percentage in `0.0..=100.0`. Zero-byte objects report 100.
    pub fn percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.bytes_transferred as f64 / self.total_bytes as f64) * 100.0
    }

    /// Whether every byte has been written.
    pub fn is_complete(&self) -> bool {
        self.bytes_transferred >= self.total_bytes
    }
}

/// How a resumable transfer ended, when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The object was fully written.
    Completed {
        /// Bytes written.
        bytes_written: u64,
    },
    /// The transfer was deliberately cancelled; any partial object was
    /// removed. Not an error, and not grounds for a fallback retry.
    Cancelled,
}

/// Handle to an in-flight resumable transfer.
///
/// Exposes a progress stream and a cancel token while the background write
/// runs; [`ResumableTransfer::wait`] resolves to the final outcome. Transport
/// failures surface as `Err`, a deliberate cancel as
/// `Ok(TransferOutcome::Cancelled)`.
#[derive(Debug)]
pub struct ResumableTransfer {
    progress: watch::Receiver<TransferProgress>,
    cancel: CancellationToken,
    task: JoinHandle<AppResult<TransferOutcome>>,
}

impl ResumableTransfer {
    /// Assemble a transfer handle from its parts. Called by providers.
    pub fn new(
        progress: watch::Receiver<TransferProgress>,
        cancel: CancellationToken,
        task: JoinHandle<AppResult<TransferOutcome>>,
    ) -> Self {
        Self {
            progress,
            cancel,
            task,
        }
    }

    /// A receiver for progress updates.
    pub fn progress(&self) -> watch::Receiver<TransferProgress> {
        self.progress.clone()
    }

    /// The cancel handle for this transfer only. Cancelling it does not
    /// affect sibling transfers.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Abort the transfer in place.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Wait for the transfer to finish.
    pub async fn wait(self) -> AppResult<TransferOutcome> {
        self.task
            .await
            .map_err(|e| AppError::internal(format!("Transfer task panicked: {e}")))?
    }
}

/// Trait for blob storage backends.
///
/// The reference implementation is the local filesystem provider in
/// `sitedock-storage`; an S3-compatible provider would plug in at the
/// same seam. `delete` must be idempotent: removing an absent object is
/// not an error, which is what makes recursive deletes safely retryable.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a whole object in one call.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Start a resumable chunked write with progress and cancellation.
    async fn put_resumable(&self, path: &str, data: Bytes) -> AppResult<ResumableTransfer>;

    /// Read an object into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Read an object addressed by a retrieval URL previously returned by
    /// [`BlobStore::url_for`].
    async fn read_url(&self, url: &str) -> AppResult<Bytes>;

    /// Delete an object. Deleting a non-existent object is not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// A stable retrieval URL for an object path.
    fn url_for(&self, path: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_midway() {
        let progress = TransferProgress {
            bytes_transferred: 25,
            total_bytes: 100,
        };
        assert_eq!(progress.percent(), 25.0);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_percent_zero_byte_object() {
        let progress = TransferProgress::start(0);
        assert_eq!(progress.percent(), 100.0);
        assert!(progress.is_complete());
    }
}
