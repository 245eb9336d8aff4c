//! The authenticated (or anonymous) identity performing an operation.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// An established identity. Blob writes require one; it may be a transient
/// anonymous identity in non-production contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// The user id.
    pub user_id: UserId,
    /// Display name for notifications and activity entries.
    pub display_name: String,
    /// Whether this identity was minted anonymously.
    pub anonymous: bool,
}

impl Identity {
    /// Create an identity for a known user.
    pub fn user(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            anonymous: false,
        }
    }

    /// Mint a transient anonymous identity.
    pub fn anonymous() -> Self {
        Self {
            user_id: UserId::new(),
            display_name: "anonymous".to_string(),
            anonymous: true,
        }
    }
}
