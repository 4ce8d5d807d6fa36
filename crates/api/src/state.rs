use std::sync::Arc;

use vitalis_core::clock::{Clock, SystemClock};

use crate::auth::directory::{PgUserDirectory, UserDirectory};
use crate::auth::guard::AuthGuard;
use crate::auth::jwt::TokenCodec;
use crate::auth::password::Argon2Hasher;
use crate::auth::service::AuthService;
use crate::auth::store::PgSessionStore;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: vitalis_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Login, refresh, and revocation.
    pub auth: Arc<AuthService>,
    /// Bearer token resolution for protected routes.
    pub guard: Arc<AuthGuard>,
}

impl AppState {
    /// Wire the Postgres-backed auth stack against the system clock.
    pub fn new(pool: vitalis_db::DbPool, config: ServerConfig) -> Self {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    /// Same as [`AppState::new`] with an explicit time source.
    pub fn with_clock(pool: vitalis_db::DbPool, config: ServerConfig, clock: Arc<dyn Clock>) -> Self {
        let codec = Arc::new(TokenCodec::new(&config.jwt, clock.clone()));
        let users: Arc<dyn UserDirectory> = Arc::new(PgUserDirectory::new(pool.clone()));

        let auth = AuthService::new(
            codec.clone(),
            Arc::new(PgSessionStore::new(pool.clone())),
            users.clone(),
            Arc::new(Argon2Hasher),
            clock,
            config.min_password_length,
        );
        let guard = AuthGuard::new(codec, users);

        Self {
            pool,
            config: Arc::new(config),
            auth: Arc::new(auth),
            guard: Arc::new(guard),
        }
    }
}
