//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for the local blob provider.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum size of a single uploaded file in bytes (default 50 MiB).
    /// Oversized files are filtered out of a pending batch, not rejected
    /// with an error.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Chunk size in bytes for resumable transfers (default 256 KiB).
    #[serde(default = "default_transfer_chunk")]
    pub transfer_chunk_size_bytes: u64,
    /// Whether a transient anonymous identity may be minted when no user
    /// is signed in. Only sensible outside production.
    #[serde(default)]
    pub anonymous_identity_allowed: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_bytes: default_max_upload(),
            transfer_chunk_size_bytes: default_transfer_chunk(),
            anonymous_identity_allowed: false,
        }
    }
}

fn default_root_path() -> String {
    "./data/blobs".to_string()
}

fn default_max_upload() -> u64 {
    50 * 1024 * 1024 // 50 MiB
}

fn default_transfer_chunk() -> u64 {
    256 * 1024 // 256 KiB
}
