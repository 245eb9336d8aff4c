//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitedock_core::types::id::FileId;
use sitedock_core::types::parent::ParentRef;

/// A file record in an entity's attachment tree.
///
/// The blob itself lives in the blob store under `storage_path`; this
/// record is the metadata half of the pair. The two are written in
/// separate calls (blob first), so a record never points at a blob that
/// was not at least attempted — but readers must still tolerate a missing
/// blob gracefully.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique file identifier, assigned by the record store.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Lower-cased extension, if the name has one.
    pub extension: Option<String>,
    /// The folder containing this file, or the root sentinel.
    pub parent: ParentRef,
    /// The blob store key. Stable, derived from entity/folder/file name.
    pub storage_path: String,
    /// Cached retrieval URL. May be absent, in which case it is re-derived
    /// from `storage_path`.
    pub download_url: Option<String>,
    /// Mirrors the owning folder's depth; display only.
    pub depth: i32,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// The folder to place the file in (root sentinel for top level).
    pub parent: ParentRef,
    /// The blob store key.
    pub storage_path: String,
    /// Cached retrieval URL, if already resolved.
    pub download_url: Option<String>,
    /// The owning folder's depth.
    pub depth: i32,
}

/// Extract the lower-cased extension from a file name, if it has one.
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit('.')
        .next()
        .filter(|ext| *ext != name && !ext.is_empty())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lowercased() {
        assert_eq!(extension_of("Agreement.PDF"), Some("pdf".to_string()));
        assert_eq!(extension_of("photo.jpeg"), Some("jpeg".to_string()));
    }

    #[test]
    fn test_extension_absent() {
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("archive."), None);
    }

    #[test]
    fn test_extension_takes_last_segment() {
        assert_eq!(extension_of("site.plan.dwg"), Some("dwg".to_string()));
    }
}
