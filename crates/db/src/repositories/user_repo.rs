//! Repository for the `users` table.

use sqlx::PgPool;
use vitalis_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_name, email_id, mobile_num, city, status, hashed_password, \
                       created_at, updated_at";

/// Provides the user-directory queries the auth subsystem needs.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (user_name, email_id, mobile_num, city, hashed_password)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.user_name)
            .bind(&input.email_id)
            .bind(&input.mobile_num)
            .bind(&input.city)
            .bind(&input.hashed_password)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email_id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Set the account active flag. Returns `true` if the row exists.
    pub async fn set_status(pool: &PgPool, id: DbId, status: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        hashed_password: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET hashed_password = $2 WHERE id = $1")
            .bind(id)
            .bind(hashed_password)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
