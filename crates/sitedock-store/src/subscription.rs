//! Live snapshot subscriptions.
//!
//! A subscription pushes the full current Folder/File collections to the
//! consumer on every change, for as long as the consuming view is active.
//! Teardown is tied to the guard: dropping a [`SnapshotSubscription`]
//! unregisters it, so an abandoned view cannot leak its subscription.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::debug;

use sitedock_core::AppError;
use sitedock_core::AppResult;
use sitedock_core::types::entity::EntityRef;
use sitedock_entity::snapshot::TreeSnapshot;

/// Registry of active snapshot subscribers, keyed by owning entity.
#[derive(Debug, Default)]
pub(crate) struct SubscriberRegistry {
    next_id: AtomicU64,
    subscribers: DashMap<EntityRef, Vec<(u64, watch::Sender<TreeSnapshot>)>>,
}

impl SubscriberRegistry {
    /// Register a new subscriber seeded with the current snapshot.
    pub(crate) fn subscribe(
        registry: &Arc<Self>,
        entity: EntityRef,
        initial: TreeSnapshot,
    ) -> SnapshotSubscription {
        let id = registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = watch::channel(initial);
        registry
            .subscribers
            .entry(entity)
            .or_default()
            .push((id, tx));
        debug!(entity = %entity, subscriber = id, "Snapshot subscription opened");

        SnapshotSubscription {
            entity,
            id,
            receiver: rx,
            registry: Arc::clone(registry),
        }
    }

    /// Push a new snapshot to every live subscriber of the entity.
    pub(crate) fn publish(&self, entity: &EntityRef, snapshot: &TreeSnapshot) {
        if let Some(mut entry) = self.subscribers.get_mut(entity) {
            entry.retain(|(_, tx)| tx.send(snapshot.clone()).is_ok());
        }
    }

    fn unsubscribe(&self, entity: &EntityRef, id: u64) {
        if let Some(mut entry) = self.subscribers.get_mut(entity) {
            entry.retain(|(sub_id, _)| *sub_id != id);
        }
        debug!(entity = %entity, subscriber = id, "Snapshot subscription closed");
    }

    /// Number of live subscribers for an entity.
    pub(crate) fn subscriber_count(&self, entity: &EntityRef) -> usize {
        self.subscribers.get(entity).map_or(0, |e| e.len())
    }
}

/// A live snapshot subscription for one entity's attachment tree.
///
/// Holds the latest pushed [`TreeSnapshot`]; await [`changed`] to be woken
/// on the next remote change. Dropping the subscription tears it down.
///
/// [`changed`]: SnapshotSubscription::changed
#[derive(Debug)]
pub struct SnapshotSubscription {
    entity: EntityRef,
    id: u64,
    receiver: watch::Receiver<TreeSnapshot>,
    registry: Arc<SubscriberRegistry>,
}

impl SnapshotSubscription {
    /// The entity this subscription observes.
    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    /// The most recently pushed snapshot.
    pub fn latest(&self) -> TreeSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next pushed snapshot and return it.
    pub async fn changed(&mut self) -> AppResult<TreeSnapshot> {
        self.receiver
            .changed()
            .await
            .map_err(|_| AppError::store("Record store dropped while subscription was active"))?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

impl Drop for SnapshotSubscription {
    fn drop(&mut self) {
        self.registry.unsubscribe(&self.entity, self.id);
    }
}
