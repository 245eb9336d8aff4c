//! Owning business entity kinds and references.
//!
//! Every attachment tree is scoped under exactly one owning entity. The
//! entity kind also determines the first segment of every storage path,
//! so the collection names here must stay stable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::EntityId;

/// The kind of business entity an attachment tree belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A sales lead.
    Lead,
    /// A client account.
    Client,
    /// A construction project.
    Project,
    /// A warranty case.
    Warranty,
}

impl EntityKind {
    /// The singular kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Client => "client",
            Self::Project => "project",
            Self::Warranty => "warranty",
        }
    }

    /// The plural collection name used as the first storage path segment.
    ///
    /// Note the irregular plural: `warranty` pluralizes to `warranties`,
    /// not `warrantys`.
    pub fn collection_name(&self) -> &'static str {
        match self {
            Self::Lead => "leads",
            Self::Client => "clients",
            Self::Project => "projects",
            Self::Warranty => "warranties",
        }
    }

    /// All entity kinds.
    pub fn all() -> [EntityKind; 4] {
        [Self::Lead, Self::Client, Self::Project, Self::Warranty]
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(Self::Lead),
            "client" => Ok(Self::Client),
            "project" => Ok(Self::Project),
            "warranty" => Ok(Self::Warranty),
            other => Err(AppError::validation(format!(
                "Unknown entity kind: {other}"
            ))),
        }
    }
}

/// A reference to one owning entity: the scope of a single attachment tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    /// The entity kind.
    pub kind: EntityKind,
    /// The entity identifier.
    pub id: EntityId,
}

impl EntityRef {
    /// Create a new entity reference.
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.collection_name(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names() {
        assert_eq!(EntityKind::Lead.collection_name(), "leads");
        assert_eq!(EntityKind::Client.collection_name(), "clients");
        assert_eq!(EntityKind::Project.collection_name(), "projects");
    }

    #[test]
    fn test_warranty_irregular_plural() {
        assert_eq!(EntityKind::Warranty.collection_name(), "warranties");
    }

    #[test]
    fn test_from_str_roundtrip() {
        for kind in EntityKind::all() {
            let parsed: EntityKind = kind.as_str().parse().expect("should parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!("vendor".parse::<EntityKind>().is_err());
    }
}
