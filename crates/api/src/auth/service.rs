//! Login, session issuance, refresh, and revocation.
//!
//! [`AuthService`] is built once per process from injected collaborators and
//! shared through [`AppState`](crate::state::AppState). It is the only writer
//! of refresh sessions.
//!
//! Expected failures (bad password, unusable refresh token) come back as
//! `Ok(None)`; `Err` is reserved for store and signing failures, which are
//! logged where they are translated.

use std::sync::Arc;

use serde::Serialize;
use vitalis_core::clock::Clock;
use vitalis_core::error::{CoreError, CoreResult, FieldError};
use vitalis_core::types::DbId;
use vitalis_db::models::user::User;

use crate::auth::directory::UserDirectory;
use crate::auth::jwt::{RefreshClaims, TokenCodec};
use crate::auth::password::{validate_password_strength, PasswordHasher, UNMATCHABLE_DIGEST};
use crate::auth::store::{NewSession, SessionStore};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Non-sensitive identity fields returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySummary {
    pub user_id: DbId,
    pub user_name: String,
    pub email_id: String,
    pub mobile_num: String,
    pub city: String,
    pub status: bool,
}

impl From<&User> for IdentitySummary {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            user_name: user.user_name.clone(),
            email_id: user.email_id.clone(),
            mobile_num: user.mobile_num.clone(),
            city: user.city.clone(),
            status: user.status,
        }
    }
}

/// Token pair handed out at login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: IdentitySummary,
}

/// A new access token minted from a refresh token.
#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    pub access_token: String,
    pub expires_in: i64,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct AuthService {
    codec: Arc<TokenCodec>,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserDirectory>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    min_password_length: usize,
}

impl AuthService {
    pub fn new(
        codec: Arc<TokenCodec>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserDirectory>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
        min_password_length: usize,
    ) -> Self {
        Self {
            codec,
            sessions,
            users,
            hasher,
            clock,
            min_password_length,
        }
    }

    /// Check an email/password pair.
    ///
    /// Unknown email, an account with no stored hash, and a wrong password all
    /// yield `Ok(None)`; callers must not tell them apart. Every path pays
    /// for one hash verification.
    pub async fn authenticate(&self, email: &str, password: &str) -> CoreResult<Option<User>> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.hasher.verify(password, UNMATCHABLE_DIGEST)?;
            return Ok(None);
        };
        let Some(digest) = user.hashed_password.as_deref() else {
            self.hasher.verify(password, UNMATCHABLE_DIGEST)?;
            return Ok(None);
        };
        if !self.hasher.verify(password, digest)? {
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Mint an access/refresh pair for `user` and persist the refresh session.
    pub async fn issue_session(
        &self,
        user: &User,
        device_info: Option<String>,
    ) -> CoreResult<IssuedSession> {
        let access_token = self
            .codec
            .encode_access(&user.email_id, user.id, &user.mobile_num)?;
        let refresh = self.codec.encode_refresh(&user.email_id, user.id)?;

        let now = self.clock.now();
        let session = self
            .sessions
            .create(NewSession {
                user_id: user.id,
                refresh_token: refresh.token.clone(),
                jti: refresh.claims.jti.clone(),
                created_at: now,
                expires_at: now + self.codec.refresh_ttl(),
                device_info,
            })
            .await?;

        tracing::info!(user_id = user.id, session_id = session.id, "Session issued");

        Ok(IssuedSession {
            access_token,
            refresh_token: refresh.token,
            expires_in: self.codec.access_expires_in(),
            user: IdentitySummary::from(user),
        })
    }

    /// Mint a new access token from a refresh token.
    ///
    /// The refresh token is neither rotated nor consumed; concurrent calls
    /// with the same token all succeed while its session stays active.
    pub async fn refresh(&self, refresh_token: &str) -> CoreResult<Option<RefreshedAccess>> {
        let Some(claims) = self.codec.decode::<RefreshClaims>(refresh_token) else {
            tracing::warn!(reason = "undecodable", "Refresh rejected");
            return Ok(None);
        };

        let now = self.clock.now();
        let Some(session) = self.sessions.find_active(refresh_token, now).await? else {
            tracing::warn!(user_id = claims.user_id, reason = "no active session", "Refresh rejected");
            return Ok(None);
        };

        let Some(user) = self.users.find_by_email(&claims.sub).await? else {
            tracing::warn!(user_id = claims.user_id, reason = "identity gone", "Refresh rejected");
            return Ok(None);
        };

        let access_token = self
            .codec
            .encode_access(&user.email_id, user.id, &user.mobile_num)?;

        tracing::debug!(user_id = user.id, session_id = session.id, "Access token refreshed");

        Ok(Some(RefreshedAccess {
            access_token,
            expires_in: self.codec.access_expires_in(),
        }))
    }

    /// Revoke the session behind `refresh_token` on behalf of `owner`.
    ///
    /// Returns whether a session was ever issued for the token; revoking an
    /// already-revoked session reports `true`. A token that decodes to another
    /// user is left alone and reported as `false`.
    pub async fn revoke(&self, refresh_token: &str, owner: DbId) -> CoreResult<bool> {
        if let Some(claims) = self.codec.decode::<RefreshClaims>(refresh_token) {
            if claims.user_id != owner {
                tracing::warn!(
                    user_id = owner,
                    token_user_id = claims.user_id,
                    "Revoke requested for another user's refresh token"
                );
                return Ok(false);
            }
        }

        let found = self
            .sessions
            .deactivate(refresh_token, self.clock.now())
            .await?;
        if found {
            tracing::info!("Refresh session revoked");
        } else {
            tracing::warn!("Revoke requested for an unknown refresh token");
        }
        Ok(found)
    }

    /// Revoke every session belonging to `user_id`.
    pub async fn revoke_all(&self, user_id: DbId) -> CoreResult<bool> {
        let revoked = self
            .sessions
            .deactivate_all(user_id, self.clock.now())
            .await?;
        tracing::info!(user_id, revoked, "All sessions revoked");
        Ok(true)
    }

    /// Replace `user`'s password and sign them out everywhere.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> CoreResult<()> {
        let Some(digest) = user.hashed_password.as_deref() else {
            return Err(CoreError::Validation(
                "Password login is not enabled for this account".into(),
            ));
        };
        if !self.hasher.verify(current_password, digest)? {
            return Err(CoreError::Validation("Current password is incorrect".into()));
        }
        if let Err(msg) = validate_password_strength(new_password, self.min_password_length) {
            return Err(CoreError::InvalidFields(vec![FieldError::new(
                "new_password",
                msg,
            )]));
        }

        let new_digest = self.hasher.hash(new_password)?;

        // Sessions go first: if this fails the old password is still the
        // live one and nothing has half-changed.
        self.revoke_all(user.id).await?;

        if !self.users.update_password(user.id, &new_digest).await? {
            return Err(CoreError::internal(
                "user_directory.update_password",
                "user row disappeared",
            ));
        }
        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }

    /// Delete sessions that have expired. Used by the periodic sweep.
    pub async fn purge_expired(&self) -> CoreResult<u64> {
        self.sessions.purge_expired(self.clock.now()).await
    }
}
