//! Request context carrying the acting identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitedock_core::types::id::UserId;
use sitedock_core::types::identity::Identity;

/// Context for the current operation.
///
/// Constructed by the embedding application and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting identity.
    pub identity: Identity,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            request_time: Utc::now(),
        }
    }

    /// The acting user's id.
    pub fn user_id(&self) -> UserId {
        self.identity.user_id
    }

    /// Whether the acting identity is a transient anonymous one.
    pub fn is_anonymous(&self) -> bool {
        self.identity.anonymous
    }
}
