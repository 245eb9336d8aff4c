//! Shared test helpers for attachment workflow tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use sitedock_core::AppError;
use sitedock_core::AppResult;
use sitedock_core::config::storage::StorageConfig;
use sitedock_core::config::tree::TreeConfig;
use sitedock_core::events::DomainEvent;
use sitedock_core::traits::blob_store::{BlobStore, ResumableTransfer};
use sitedock_core::traits::outbox::{ActivityLog, Notifier};
use sitedock_core::types::entity::{EntityKind, EntityRef};
use sitedock_core::types::id::{EntityId, UserId};
use sitedock_core::types::identity::Identity;

use sitedock_service::{Outbox, RequestContext};
use sitedock_service::{
    ArchiveService, DeletionEngine, FolderService, StaticIdentityProvider, UploadService,
};
use sitedock_storage::LocalBlobStore;
use sitedock_store::MemoryRecordStore;

/// A fully wired attachment stack over a temp-dir blob root.
pub struct TestHub {
    pub store: Arc<MemoryRecordStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub folders: FolderService,
    pub uploads: UploadService,
    pub deletion: DeletionEngine,
    pub archive: ArchiveService,
    pub notifications: Arc<RecordingNotifier>,
    pub entity: EntityRef,
    pub ctx: RequestContext,
    _blob_root: tempfile::TempDir,
}

impl TestHub {
    /// A hub with a reliable local blob store.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp blob root");
        let local = LocalBlobStore::new(dir.path().to_str().expect("utf-8 temp path"), 64 * 1024)
            .await
            .expect("create blob store");
        Self::with_blobs(dir, Arc::new(local)).await
    }

    /// A hub whose blob store fails every write for paths containing
    /// `fail_marker`.
    pub async fn with_flaky_blobs(fail_marker: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp blob root");
        let local = LocalBlobStore::new(dir.path().to_str().expect("utf-8 temp path"), 64 * 1024)
            .await
            .expect("create blob store");
        let flaky = FlakyBlobStore {
            inner: Arc::new(local),
            fail_marker: fail_marker.to_string(),
        };
        Self::with_blobs(dir, Arc::new(flaky)).await
    }

    async fn with_blobs(dir: tempfile::TempDir, blobs: Arc<dyn BlobStore>) -> Self {
        let store = Arc::new(MemoryRecordStore::new());
        let notifications = Arc::new(RecordingNotifier::default());
        let outbox = Outbox::new(notifications.clone(), Arc::new(RecordingActivityLog::default()));

        let identity = Identity::user(UserId::new(), "Rei Tanaka");
        let provider = Arc::new(StaticIdentityProvider::new(identity.clone()));

        let tree_config = TreeConfig::default();
        let storage_config = StorageConfig::default();

        Self {
            folders: FolderService::new(store.clone(), outbox.clone(), tree_config.clone()),
            uploads: UploadService::new(
                store.clone(),
                blobs.clone(),
                provider,
                outbox.clone(),
                storage_config,
            ),
            deletion: DeletionEngine::new(
                store.clone(),
                blobs.clone(),
                outbox.clone(),
                tree_config.clone(),
            ),
            archive: ArchiveService::new(store.clone(), blobs.clone(), outbox, tree_config),
            store,
            blobs,
            notifications,
            entity: EntityRef::new(EntityKind::Project, EntityId::new()),
            ctx: RequestContext::new(identity),
            _blob_root: dir,
        }
    }

    /// A small pending file with deterministic content.
    pub fn pending(name: &str, size: usize) -> sitedock_service::PendingFile {
        sitedock_service::PendingFile::new(name, vec![0xA5u8; size])
    }
}

/// Notifier that records every delivery for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub added: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn attachment_added(
        &self,
        _entity: &EntityRef,
        _actor: &Identity,
        file_name: &str,
    ) -> AppResult<()> {
        self.added.lock().unwrap().push(file_name.to_string());
        Ok(())
    }

    async fn attachment_deleted(
        &self,
        _entity: &EntityRef,
        _actor: &Identity,
        file_name: &str,
    ) -> AppResult<()> {
        self.deleted.lock().unwrap().push(file_name.to_string());
        Ok(())
    }
}

/// Notifier whose deliveries always fail. Primary operations must not
/// notice.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn attachment_added(
        &self,
        _entity: &EntityRef,
        _actor: &Identity,
        _file_name: &str,
    ) -> AppResult<()> {
        Err(AppError::internal("notification channel down"))
    }

    async fn attachment_deleted(
        &self,
        _entity: &EntityRef,
        _actor: &Identity,
        _file_name: &str,
    ) -> AppResult<()> {
        Err(AppError::internal("notification channel down"))
    }
}

/// Activity log that records every event.
#[derive(Debug, Default)]
pub struct RecordingActivityLog {
    pub events: Mutex<Vec<DomainEvent>>,
}

#[async_trait]
impl ActivityLog for RecordingActivityLog {
    async fn log_activity(&self, _entity: &EntityRef, event: &DomainEvent) -> AppResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Blob store that fails every write touching paths with a marker
/// substring — both the resumable attempt and the whole-object fallback.
#[derive(Debug)]
pub struct FlakyBlobStore {
    pub inner: Arc<LocalBlobStore>,
    pub fail_marker: String,
}

impl FlakyBlobStore {
    fn should_fail(&self, path: &str) -> bool {
        path.contains(&self.fail_marker)
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    fn provider_type(&self) -> &str {
        "flaky"
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        if self.should_fail(path) {
            return Err(AppError::transfer("injected transport failure"));
        }
        self.inner.put(path, data).await
    }

    async fn put_resumable(&self, path: &str, data: Bytes) -> AppResult<ResumableTransfer> {
        if self.should_fail(path) {
            return Err(AppError::transfer("injected transport failure"));
        }
        self.inner.put_resumable(path, data).await
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(path).await
    }

    async fn read_url(&self, url: &str) -> AppResult<Bytes> {
        self.inner.read_url(url).await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.inner.delete(path).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }

    fn url_for(&self, path: &str) -> String {
        self.inner.url_for(path)
    }
}
