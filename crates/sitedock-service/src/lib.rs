//! # sitedock-service
//!
//! Business logic layer for SiteDock attachments. Each service
//! orchestrates the record store, blob store, and best-effort
//! collaborators to implement one slice of the attachment workflow.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod archive;
pub mod context;
pub mod delete;
pub mod folder;
pub mod identity;
pub mod outbox;
pub mod tree;
pub mod upload;

pub use archive::{ArchiveService, NamedBlob};
pub use context::RequestContext;
pub use delete::DeletionEngine;
pub use folder::FolderService;
pub use identity::{AnonymousIdentityProvider, StaticIdentityProvider};
pub use outbox::{NullActivityLog, NullNotifier, Outbox};
pub use tree::{Breadcrumb, Crumb, TreeView};
pub use upload::{PendingFile, UploadEvent, UploadService, UploadTarget};
