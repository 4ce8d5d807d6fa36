//! Read access to the user directory.

use async_trait::async_trait;
use vitalis_core::error::{CoreError, CoreResult};
use vitalis_core::types::DbId;
use vitalis_db::models::user::User;
use vitalis_db::repositories::UserRepo;
use vitalis_db::DbPool;

/// Lookup of identities by email, plus the one write auth needs.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    /// Replace the stored password hash. Returns `false` if the user is gone.
    async fn update_password(&self, user_id: DbId, hashed_password: &str) -> CoreResult<bool>;
}

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: DbPool,
}

impl PgUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn directory_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |e| {
        tracing::error!(operation, error = %e, "User directory failure");
        CoreError::internal(operation, e)
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        UserRepo::find_by_email(&self.pool, email)
            .await
            .map_err(directory_error("user_directory.find_by_email"))
    }

    async fn update_password(&self, user_id: DbId, hashed_password: &str) -> CoreResult<bool> {
        UserRepo::update_password(&self.pool, user_id, hashed_password)
            .await
            .map_err(directory_error("user_directory.update_password"))
    }
}
