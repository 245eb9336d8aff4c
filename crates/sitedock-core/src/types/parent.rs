//! Parent references for folder and file records.
//!
//! The tree root is a synthetic sentinel: it has depth 0, is never stored
//! as a folder record, and serializes as the literal string `root`. Keeping
//! it as a distinct variant (instead of a folder record with a magic id)
//! means it can never be renamed, deleted, or accidentally persisted.

use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::types::id::FolderId;

/// The string form of the root sentinel, both in serialized records and in
/// the `{folderId}` storage path segment.
pub const ROOT_SENTINEL: &str = "root";

/// Where a folder or file record hangs in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// The synthetic tree root (depth 0, never persisted).
    Root,
    /// A stored folder record.
    Folder(FolderId),
}

impl ParentRef {
    /// Whether this reference points at the tree root.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// The folder id, if this is not the root.
    pub fn folder_id(&self) -> Option<FolderId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(*id),
        }
    }

    /// The storage path segment for this parent (`root` or the folder UUID).
    pub fn path_segment(&self) -> String {
        self.to_string()
    }
}

impl From<FolderId> for ParentRef {
    fn from(id: FolderId) -> Self {
        Self::Folder(id)
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "{ROOT_SENTINEL}"),
            Self::Folder(id) => write!(f, "{id}"),
        }
    }
}

impl Serialize for ParentRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ParentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == ROOT_SENTINEL {
            return Ok(Self::Root);
        }
        Uuid::parse_str(&s)
            .map(|u| Self::Folder(FolderId::from_uuid(u)))
            .map_err(|_| D::Error::custom(format!("invalid parent reference: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(ParentRef::Root.to_string(), "root");
        assert!(ParentRef::Root.is_root());
        assert_eq!(ParentRef::Root.folder_id(), None);
    }

    #[test]
    fn test_folder_display_is_uuid() {
        let id = FolderId::new();
        let parent = ParentRef::Folder(id);
        assert_eq!(parent.to_string(), id.to_string());
        assert_eq!(parent.folder_id(), Some(id));
    }

    #[test]
    fn test_serde_roundtrip() {
        let root_json = serde_json::to_string(&ParentRef::Root).expect("serialize");
        assert_eq!(root_json, "\"root\"");
        let parsed: ParentRef = serde_json::from_str(&root_json).expect("deserialize");
        assert_eq!(parsed, ParentRef::Root);

        let parent = ParentRef::Folder(FolderId::new());
        let json = serde_json::to_string(&parent).expect("serialize");
        let parsed: ParentRef = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, parent);
    }

    #[test]
    fn test_invalid_parent_rejected() {
        assert!(serde_json::from_str::<ParentRef>("\"not-a-uuid\"").is_err());
    }
}
