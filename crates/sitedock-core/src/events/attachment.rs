//! Attachment-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::id::{FileId, FolderId};

/// Events related to attachment tree operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AttachmentEvent {
    /// A folder was created.
    FolderCreated {
        /// The folder ID.
        folder_id: FolderId,
        /// The folder name.
        name: String,
        /// Depth in the tree (top-level folders are depth 1).
        depth: i32,
    },
    /// A folder was renamed.
    FolderRenamed {
        /// The folder ID.
        folder_id: FolderId,
        /// The previous name.
        old_name: String,
        /// The new name.
        new_name: String,
    },
    /// A folder and all its descendants were deleted.
    FolderDeleted {
        /// The folder ID.
        folder_id: FolderId,
        /// The folder name (for display after deletion).
        name: String,
    },
    /// A file finished uploading.
    FileUploaded {
        /// The file ID.
        file_id: FileId,
        /// The file name.
        name: String,
        /// The file size in bytes.
        size_bytes: i64,
    },
    /// A file was renamed.
    FileRenamed {
        /// The file ID.
        file_id: FileId,
        /// The previous name.
        old_name: String,
        /// The new name.
        new_name: String,
    },
    /// A file was deleted.
    FileDeleted {
        /// The file ID.
        file_id: FileId,
        /// The file name (for display after deletion).
        name: String,
    },
    /// A folder was exported as an archive.
    FolderArchived {
        /// The folder ID.
        folder_id: FolderId,
        /// The archive name.
        archive_name: String,
        /// How many files the archive contains.
        entry_count: usize,
    },
}
