//! Identity provider interface consumed by the access gate and auth routes.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::session::Session;

/// The user behind a session, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a successful password sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    pub user: CurrentUser,
    /// Token lifetime in seconds, when the provider reports one.
    pub expires_in: Option<i64>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider returned status {0}")]
    Status(u16),
    #[error("invalid identity provider response: {0}")]
    InvalidResponse(String),
    #[error("invalid email or password")]
    InvalidCredentials,
}

/// Session/identity operations.
///
/// Implementations must be cheap to share (`Arc<dyn IdentityProvider>`).
/// Every call is a single attempt; callers decide how a failure is treated.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Resolve the user for an access token.
    ///
    /// - `Ok(None)`: the token is not (or no longer) valid
    /// - `Err(_)`: the provider could not answer
    async fn current_user(&self, access_token: &str) -> Result<Option<CurrentUser>, IdentityError>;

    /// Does the subject of `access_token` hold `role`?
    async fn has_role(&self, access_token: &str, role: &str) -> Result<bool, IdentityError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, IdentityError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), IdentityError>;
}
