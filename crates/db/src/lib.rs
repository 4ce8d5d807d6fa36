//! Postgres persistence for the vitalis backend.
//!
//! - [`models`] -- row types and insert DTOs.
//! - [`repositories`] -- query functions, one zero-sized repo per table.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// `acquire_timeout` bounds how long a store call may wait for a connection;
/// an exhausted wait surfaces as an error, never as a silent retry.
pub async fn create_pool(database_url: &str, acquire_timeout: Duration) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
