//! User directory model and DTOs.

use sqlx::FromRow;
use vitalis_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub user_name: String,
    pub email_id: String,
    pub mobile_num: String,
    pub city: String,
    /// Account active flag. Flipping this to `false` cuts off access immediately.
    pub status: bool,
    /// `None` for accounts that were never migrated to password authentication.
    pub hashed_password: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub user_name: String,
    pub email_id: String,
    pub mobile_num: String,
    pub city: String,
    pub hashed_password: Option<String>,
}
