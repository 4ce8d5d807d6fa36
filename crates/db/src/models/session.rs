//! Refresh session model and DTOs.

use sqlx::FromRow;
use vitalis_core::types::{DbId, Timestamp};

/// A row from the `refresh_sessions` table.
///
/// Usable only while `is_active` is true and `expires_at` is in the future.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub jti: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub is_active: bool,
    pub revoked_at: Option<Timestamp>,
    pub device_info: Option<String>,
}

/// DTO for creating a new session. Sessions are always inserted active.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub jti: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub device_info: Option<String>,
}
