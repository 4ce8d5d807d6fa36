//! Repository for the `refresh_sessions` table.
//!
//! Every time comparison takes `now` from the caller instead of using the
//! database clock, so expiry follows the service's injected clock.

use sqlx::PgPool;
use vitalis_core::types::{DbId, Timestamp};

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, refresh_token_hash, jti, created_at, expires_at, \
                       is_active, revoked_at, device_info";

/// Provides CRUD operations for refresh sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new active session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_sessions
                (user_id, refresh_token_hash, jti, created_at, expires_at, is_active, device_info)
             VALUES ($1, $2, $3, $4, $5, true, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(&input.jti)
            .bind(input.created_at)
            .bind(input.expires_at)
            .bind(&input.device_info)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its token hash regardless of state.
    pub async fn find_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM refresh_sessions WHERE refresh_token_hash = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Find a usable session by its token hash.
    ///
    /// Only returns sessions that are active and expire strictly after `now`.
    pub async fn find_active_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
        now: Timestamp,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM refresh_sessions
             WHERE refresh_token_hash = $1
               AND is_active = true
               AND expires_at > $2"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate the session holding `hash`.
    ///
    /// Returns `true` when the session exists and is now inactive, whether this
    /// call flipped it or it was already revoked. Returns `false` only when no
    /// session carries that hash. The conditional update means concurrent
    /// callers converge on a single `revoked_at`.
    pub async fn deactivate_by_refresh_token_hash(
        pool: &PgPool,
        hash: &str,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET is_active = false, revoked_at = $2
             WHERE refresh_token_hash = $1 AND is_active = true",
        )
        .bind(hash)
        .bind(now)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM refresh_sessions WHERE refresh_token_hash = $1)",
        )
        .bind(hash)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Deactivate every active session for a user. Returns the count flipped.
    pub async fn deactivate_all_for_user(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET is_active = false, revoked_at = $2
             WHERE user_id = $1 AND is_active = true",
        )
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List every session for a user, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM refresh_sessions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Delete sessions whose expiry is before `now`. Returns the count deleted.
    ///
    /// Revoked-but-unexpired rows are kept; they still record the revocation.
    pub async fn delete_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM refresh_sessions WHERE expires_at < $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
