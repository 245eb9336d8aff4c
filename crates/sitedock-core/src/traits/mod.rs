//! Collaborator traits defined in `sitedock-core` and implemented by other
//! crates or by the embedding application.

pub mod blob_store;
pub mod identity;
pub mod outbox;

pub use blob_store::{BlobStore, ResumableTransfer, TransferOutcome, TransferProgress};
pub use identity::IdentityProvider;
pub use outbox::{ActivityLog, Notifier};
