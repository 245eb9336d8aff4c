//! Best-effort outbox for notifications and activity logging.
//!
//! Called only after the primary operation has committed. Every delivery
//! failure is logged and swallowed here — auxiliary side effects never
//! abort or roll back the operation that triggered them.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use sitedock_core::AppResult;
use sitedock_core::events::{AttachmentEvent, DomainEvent};
use sitedock_core::traits::outbox::{ActivityLog, Notifier};
use sitedock_core::types::entity::EntityRef;
use sitedock_core::types::id::UserId;
use sitedock_core::types::identity::Identity;

/// Fan-out point for fire-and-forget side effects.
#[derive(Debug, Clone)]
pub struct Outbox {
    notifier: Arc<dyn Notifier>,
    activity: Arc<dyn ActivityLog>,
}

impl Outbox {
    /// Create an outbox over the given collaborators.
    pub fn new(notifier: Arc<dyn Notifier>, activity: Arc<dyn ActivityLog>) -> Self {
        Self { notifier, activity }
    }

    /// An outbox that drops everything. Useful for embedding contexts
    /// without notification plumbing.
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullNotifier), Arc::new(NullActivityLog))
    }

    /// Notify the entity's subscribers that an attachment was added.
    pub async fn attachment_added(&self, entity: &EntityRef, actor: &Identity, file_name: &str) {
        if let Err(e) = self.notifier.attachment_added(entity, actor, file_name).await {
            warn!(entity = %entity, file_name, error = %e, "Attachment-added notification failed");
        }
    }

    /// Notify the entity's subscribers that an attachment was deleted.
    pub async fn attachment_deleted(&self, entity: &EntityRef, actor: &Identity, file_name: &str) {
        if let Err(e) = self
            .notifier
            .attachment_deleted(entity, actor, file_name)
            .await
        {
            warn!(entity = %entity, file_name, error = %e, "Attachment-deleted notification failed");
        }
    }

    /// Append an event to the entity's activity feed.
    pub async fn record_activity(
        &self,
        entity: &EntityRef,
        actor_id: Option<UserId>,
        event: AttachmentEvent,
    ) {
        let event = DomainEvent::new(actor_id, event);
        if let Err(e) = self.activity.log_activity(entity, &event).await {
            warn!(entity = %entity, error = %e, "Activity log write failed");
        }
    }
}

/// Notifier that silently accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn attachment_added(
        &self,
        _entity: &EntityRef,
        _actor: &Identity,
        _file_name: &str,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn attachment_deleted(
        &self,
        _entity: &EntityRef,
        _actor: &Identity,
        _file_name: &str,
    ) -> AppResult<()> {
        Ok(())
    }
}

/// Activity log that silently accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullActivityLog;

#[async_trait]
impl ActivityLog for NullActivityLog {
    async fn log_activity(&self, _entity: &EntityRef, _event: &DomainEvent) -> AppResult<()> {
        Ok(())
    }
}
