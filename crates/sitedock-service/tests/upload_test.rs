//! Upload pipeline tests: size filter, sequencing, fallback, identity,
//! and progress reporting.

mod helpers;

use std::sync::Arc;

use tokio::sync::mpsc;

use sitedock_core::config::storage::StorageConfig;
use sitedock_core::error::ErrorKind;
use sitedock_core::types::parent::ParentRef;
use sitedock_service::{
    AnonymousIdentityProvider, Breadcrumb, Outbox, PendingFile, UploadEvent, UploadService,
    UploadTarget,
};

use helpers::{FailingNotifier, RecordingActivityLog, TestHub};

fn root_target(hub: &TestHub) -> UploadTarget {
    UploadTarget {
        entity: hub.entity,
        parent: ParentRef::Root,
        depth: 0,
    }
}

#[tokio::test]
async fn test_upload_commits_record_and_blob() {
    let hub = TestHub::new().await;
    let target = root_target(&hub);

    let committed = hub
        .uploads
        .upload_batch(&target, vec![TestHub::pending("site-plan.PDF", 1024)], None)
        .await
        .unwrap();

    assert_eq!(committed.len(), 1);
    let record = &committed[0];
    assert_eq!(record.name, "site-plan.PDF");
    assert_eq!(record.extension.as_deref(), Some("pdf"));
    assert_eq!(record.size_bytes, 1024);
    assert_eq!(record.depth, 0);
    assert!(record.download_url.is_some());
    assert_eq!(
        record.storage_path,
        format!("projects/{}/root/site-plan.PDF", hub.entity.id)
    );

    assert!(hub.blobs.exists(&record.storage_path).await.unwrap());
    assert_eq!(
        hub.notifications.added.lock().unwrap().as_slice(),
        ["site-plan.PDF"]
    );
}

#[tokio::test]
async fn test_size_filter_boundary() {
    let hub = TestHub::new().await;
    const MIB: usize = 1024 * 1024;

    let at_cap = PendingFile::new("exact.bin", vec![0u8; 50 * MIB]);
    let over_cap = PendingFile::new("over.bin", vec![0u8; 50 * MIB + 1]);

    let selected = hub.uploads.select_files([at_cap, over_cap]);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].name, "exact.bin");
}

#[tokio::test]
async fn test_failing_second_file_aborts_batch() {
    let hub = TestHub::with_flaky_blobs("wont-transfer").await;
    let target = root_target(&hub);

    let batch = vec![
        TestHub::pending("first.txt", 64),
        TestHub::pending("wont-transfer.txt", 64),
        TestHub::pending("third.txt", 64),
    ];

    let err = hub
        .uploads
        .upload_batch(&target, batch, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Transfer);

    // Exactly the first file was committed; the third was never attempted.
    let files = hub.store.files(&hub.entity).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "first.txt");

    let third_path = format!("projects/{}/root/third.txt", hub.entity.id);
    assert!(!hub.blobs.exists(&third_path).await.unwrap());
}

#[tokio::test]
async fn test_no_identity_fails_before_any_transfer() {
    let hub = TestHub::new().await;
    let uploads = UploadService::new(
        hub.store.clone(),
        hub.blobs.clone(),
        Arc::new(AnonymousIdentityProvider::new(false)),
        Outbox::disabled(),
        StorageConfig::default(),
    );

    let err = uploads
        .upload_batch(
            &root_target(&hub),
            vec![TestHub::pending("report.pdf", 64)],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    // The batch failed before the first blob write.
    let path = format!("projects/{}/root/report.pdf", hub.entity.id);
    assert!(!hub.blobs.exists(&path).await.unwrap());
    assert!(hub.store.files(&hub.entity).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_identity_allowed_in_non_production() {
    let hub = TestHub::new().await;
    let uploads = UploadService::new(
        hub.store.clone(),
        hub.blobs.clone(),
        Arc::new(AnonymousIdentityProvider::new(true)),
        Outbox::disabled(),
        StorageConfig::default(),
    );

    let committed = uploads
        .upload_batch(
            &root_target(&hub),
            vec![TestHub::pending("report.pdf", 64)],
            None,
        )
        .await
        .unwrap();
    assert_eq!(committed.len(), 1);
}

#[tokio::test]
async fn test_notification_failure_does_not_fail_upload() {
    let hub = TestHub::new().await;
    let outbox = Outbox::new(
        Arc::new(FailingNotifier),
        Arc::new(RecordingActivityLog::default()),
    );
    let uploads = UploadService::new(
        hub.store.clone(),
        hub.blobs.clone(),
        Arc::new(sitedock_service::StaticIdentityProvider::new(
            hub.ctx.identity.clone(),
        )),
        outbox,
        StorageConfig::default(),
    );

    let committed = uploads
        .upload_batch(
            &root_target(&hub),
            vec![TestHub::pending("minutes.docx", 256)],
            None,
        )
        .await
        .unwrap();
    assert_eq!(committed.len(), 1);
}

#[tokio::test]
async fn test_progress_events_reach_completion() {
    let hub = TestHub::new().await;
    let target = root_target(&hub);
    let (tx, mut rx) = mpsc::unbounded_channel();

    hub.uploads
        .upload_batch(&target, vec![TestHub::pending("photo.jpg", 64)], Some(tx))
        .await
        .unwrap();

    let mut saw_started = false;
    let mut saw_committed = false;
    let mut last_percent = 0.0f64;
    while let Some(event) = rx.recv().await {
        match event {
            UploadEvent::Started { name, .. } => {
                assert_eq!(name, "photo.jpg");
                saw_started = true;
            }
            UploadEvent::Progress { percent, .. } => last_percent = percent,
            UploadEvent::Committed { file, .. } => {
                assert_eq!(file.name, "photo.jpg");
                saw_committed = true;
            }
            UploadEvent::Cancelled { name, .. } => panic!("unexpected cancellation of {name}"),
            UploadEvent::Failed { message, .. } => panic!("unexpected failure: {message}"),
        }
    }

    assert!(saw_started);
    assert!(saw_committed);
    assert_eq!(last_percent, 100.0);
}

#[tokio::test]
async fn test_cancel_skips_file_but_batch_continues() {
    let hub = TestHub::new().await;
    let target = root_target(&hub);
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Cancel the first file's transfer as soon as its handle appears;
    // the sibling transfer must be unaffected.
    let canceller = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let UploadEvent::Started {
                index: 0, cancel, ..
            } = event
            {
                cancel.cancel();
            }
        }
    });

    let committed = hub
        .uploads
        .upload_batch(
            &target,
            vec![
                TestHub::pending("dropped.bin", 1024 * 1024),
                TestHub::pending("kept.txt", 64),
            ],
            Some(tx),
        )
        .await
        .unwrap();

    canceller.await.unwrap();

    let names: Vec<&str> = committed.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["kept.txt"]);

    let files = hub.store.files(&hub.entity).await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "kept.txt");
}

#[tokio::test]
async fn test_upload_into_folder_uses_folder_segment() {
    let hub = TestHub::new().await;

    let folder = hub
        .folders
        .create_folder(&hub.ctx, &hub.entity, &Breadcrumb::root(), "Permits")
        .await
        .unwrap();

    let target = UploadTarget {
        entity: hub.entity,
        parent: ParentRef::Folder(folder.id),
        depth: folder.depth,
    };

    let committed = hub
        .uploads
        .upload_batch(&target, vec![TestHub::pending("permit.pdf", 128)], None)
        .await
        .unwrap();

    assert_eq!(
        committed[0].storage_path,
        format!("projects/{}/{}/permit.pdf", hub.entity.id, folder.id)
    );
    assert_eq!(committed[0].depth, folder.depth);
}
