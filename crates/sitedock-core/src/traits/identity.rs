//! Identity provider trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::identity::Identity;

/// Supplies the identity on whose behalf attachment operations run.
///
/// Blob writes require an established identity. Implementations may mint
/// a transient anonymous identity in non-production contexts; if none can
/// be established, `ensure_signed_in` fails and the whole batch is refused
/// before any transfer starts.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The currently signed-in identity, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Return the current identity, signing in (possibly anonymously)
    /// when there is none.
    async fn ensure_signed_in(&self) -> AppResult<Identity>;
}
