//! Per-request identity resolution.

use std::sync::Arc;

use vitalis_core::error::{CoreError, CoreResult};
use vitalis_db::models::user::User;

use crate::auth::directory::UserDirectory;
use crate::auth::jwt::{AccessClaims, TokenCodec};

/// Turns a bearer access token into the live [`User`] behind it.
///
/// Token claims are only used to find the user; account status always comes
/// from a fresh directory read. Access tokens are stateless, so revoking a
/// refresh session does not cut off an access token already issued; only
/// deactivating the account does.
pub struct AuthGuard {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserDirectory>,
}

impl AuthGuard {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserDirectory>) -> Self {
        Self { codec, users }
    }

    pub async fn resolve(&self, bearer_token: &str) -> CoreResult<User> {
        let claims: AccessClaims = self.codec.decode(bearer_token).ok_or_else(|| {
            CoreError::Unauthorized("invalid or expired credentials".into())
        })?;

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await?
            .ok_or_else(|| CoreError::Unauthorized("user no longer exists".into()))?;

        if !user.status {
            return Err(CoreError::Unauthorized("inactive account".into()));
        }

        Ok(user)
    }
}
