//! Identity provider implementations.

use std::sync::Mutex;

use async_trait::async_trait;

use sitedock_core::AppError;
use sitedock_core::AppResult;
use sitedock_core::traits::identity::IdentityProvider;
use sitedock_core::types::identity::Identity;

/// Identity provider backed by one fixed, already-authenticated identity.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    /// Create a provider for a known signed-in user.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn current_identity(&self) -> Option<Identity> {
        Some(self.identity.clone())
    }

    async fn ensure_signed_in(&self) -> AppResult<Identity> {
        Ok(self.identity.clone())
    }
}

/// Identity provider with no signed-in user that can mint a transient
/// anonymous identity on demand, when allowed.
///
/// With `allowed == false` (production), `ensure_signed_in` refuses, which
/// fails an upload batch before any transfer starts.
#[derive(Debug)]
pub struct AnonymousIdentityProvider {
    allowed: bool,
    current: Mutex<Option<Identity>>,
}

impl AnonymousIdentityProvider {
    /// Create a provider; `allowed` gates the anonymous fallback.
    pub fn new(allowed: bool) -> Self {
        Self {
            allowed,
            current: Mutex::new(None),
        }
    }

    /// Create a provider gated by the storage configuration.
    pub fn from_config(config: &sitedock_core::config::storage::StorageConfig) -> Self {
        Self::new(config.anonymous_identity_allowed)
    }
}

#[async_trait]
impl IdentityProvider for AnonymousIdentityProvider {
    fn current_identity(&self) -> Option<Identity> {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn ensure_signed_in(&self) -> AppResult<Identity> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(identity) = current.as_ref() {
            return Ok(identity.clone());
        }
        if !self.allowed {
            return Err(AppError::authentication(
                "No identity established and anonymous sign-in is disabled",
            ));
        }
        let identity = Identity::anonymous();
        *current = Some(identity.clone());
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_fallback_when_allowed() {
        let provider = AnonymousIdentityProvider::new(true);
        assert!(provider.current_identity().is_none());

        let identity = provider.ensure_signed_in().await.unwrap();
        assert!(identity.anonymous);

        // The minted identity is stable across calls.
        let again = provider.ensure_signed_in().await.unwrap();
        assert_eq!(identity, again);
    }

    #[tokio::test]
    async fn test_anonymous_refused_when_disallowed() {
        let provider = AnonymousIdentityProvider::new(false);
        let err = provider.ensure_signed_in().await.unwrap_err();
        assert_eq!(err.kind, sitedock_core::error::ErrorKind::Authentication);
    }
}
