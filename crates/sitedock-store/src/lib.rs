//! # sitedock-store
//!
//! Metadata record store for SiteDock attachments: the two flat
//! collections (`folders`, `files`) per owning entity, with CRUD and a
//! live snapshot subscription that pushes the full current collections on
//! every change.
//!
//! The in-memory implementation here is the reference adapter; a remote
//! document store would expose the same surface.

pub mod memory;
pub mod subscription;

pub use memory::MemoryRecordStore;
pub use subscription::SnapshotSubscription;
