//! # sitedock-storage
//!
//! Blob store implementations for SiteDock attachments. Ships the local
//! filesystem provider and the deterministic storage path convention;
//! S3-compatible object stores would implement the same [`BlobStore`]
//! seam.
//!
//! [`BlobStore`]: sitedock_core::traits::BlobStore

pub mod path;
pub mod providers;

pub use path::storage_path;
pub use providers::LocalBlobStore;
