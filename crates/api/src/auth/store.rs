//! Persistent record of issued refresh sessions.

use async_trait::async_trait;
use vitalis_core::error::{CoreError, CoreResult};
use vitalis_core::types::{DbId, Timestamp};
use vitalis_db::models::session::{CreateSession, UserSession};
use vitalis_db::repositories::SessionRepo;
use vitalis_db::DbPool;

use crate::auth::jwt::hash_refresh_token;

/// Input for [`SessionStore::create`].
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: DbId,
    /// The full refresh token string as handed to the client.
    pub refresh_token: String,
    pub jti: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub device_info: Option<String>,
}

/// Storage for refresh sessions.
///
/// A session is usable iff it is active, `now < expires_at`, and the presented
/// token matches exactly. Sessions move from active to revoked and never back.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a new session. Always active.
    async fn create(&self, session: NewSession) -> CoreResult<UserSession>;

    /// Find the usable session for `refresh_token` as of `now`.
    async fn find_active(
        &self,
        refresh_token: &str,
        now: Timestamp,
    ) -> CoreResult<Option<UserSession>>;

    /// Revoke the session for `refresh_token`.
    ///
    /// Idempotent: `true` if the session exists (revoked now or earlier),
    /// `false` if no session was ever issued for that token.
    async fn deactivate(&self, refresh_token: &str, now: Timestamp) -> CoreResult<bool>;

    /// Revoke every active session for `user_id`. Returns how many were flipped.
    async fn deactivate_all(&self, user_id: DbId, now: Timestamp) -> CoreResult<u64>;

    /// Delete sessions that expired before `now`. Returns how many were deleted.
    async fn purge_expired(&self, now: Timestamp) -> CoreResult<u64>;
}

/// Postgres-backed [`SessionStore`].
///
/// Tokens are stored as their SHA-256 digest, never in plaintext.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Translate a database failure, logging the operation that produced it.
fn store_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |e| {
        tracing::error!(operation, error = %e, "Session store failure");
        CoreError::internal(operation, e)
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: NewSession) -> CoreResult<UserSession> {
        let input = CreateSession {
            user_id: session.user_id,
            refresh_token_hash: hash_refresh_token(&session.refresh_token),
            jti: session.jti,
            created_at: session.created_at,
            expires_at: session.expires_at,
            device_info: session.device_info,
        };
        SessionRepo::create(&self.pool, &input)
            .await
            .map_err(store_error("session_store.create"))
    }

    async fn find_active(
        &self,
        refresh_token: &str,
        now: Timestamp,
    ) -> CoreResult<Option<UserSession>> {
        let hash = hash_refresh_token(refresh_token);
        SessionRepo::find_active_by_refresh_token_hash(&self.pool, &hash, now)
            .await
            .map_err(store_error("session_store.find_active"))
    }

    async fn deactivate(&self, refresh_token: &str, now: Timestamp) -> CoreResult<bool> {
        let hash = hash_refresh_token(refresh_token);
        SessionRepo::deactivate_by_refresh_token_hash(&self.pool, &hash, now)
            .await
            .map_err(store_error("session_store.deactivate"))
    }

    async fn deactivate_all(&self, user_id: DbId, now: Timestamp) -> CoreResult<u64> {
        SessionRepo::deactivate_all_for_user(&self.pool, user_id, now)
            .await
            .map_err(store_error("session_store.deactivate_all"))
    }

    async fn purge_expired(&self, now: Timestamp) -> CoreResult<u64> {
        SessionRepo::delete_expired(&self.pool, now)
            .await
            .map_err(store_error("session_store.purge_expired"))
    }
}
