//! Fire-and-forget collaborator traits: notifications and activity log.
//!
//! Both collaborators run *after* the primary operation commits. Their
//! failures are logged and swallowed by the caller; they never abort or
//! roll back the operation that triggered them.

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::result::AppResult;
use crate::types::entity::EntityRef;
use crate::types::identity::Identity;

/// Delivers attachment notifications to the users subscribed to an entity.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// An attachment finished uploading under the entity.
    async fn attachment_added(
        &self,
        entity: &EntityRef,
        actor: &Identity,
        file_name: &str,
    ) -> AppResult<()>;

    /// An attachment was deleted from the entity.
    async fn attachment_deleted(
        &self,
        entity: &EntityRef,
        actor: &Identity,
        file_name: &str,
    ) -> AppResult<()>;
}

/// Records attachment activity for an entity's audit trail.
#[async_trait]
pub trait ActivityLog: Send + Sync + std::fmt::Debug + 'static {
    /// Append one event to the entity's activity feed.
    async fn log_activity(&self, entity: &EntityRef, event: &DomainEvent) -> AppResult<()>;
}
