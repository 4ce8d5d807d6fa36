use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long a store call may wait for a pooled connection (default: `5`).
    pub db_acquire_timeout_secs: u64,
    /// Period of the expired-session sweep in seconds (default: `3600`).
    pub session_cleanup_interval_secs: u64,
    /// Minimum length of a new password (default: `8`).
    pub min_password_length: usize,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `DB_ACQUIRE_TIMEOUT_SECS`       | `5`                     |
    /// | `SESSION_CLEANUP_INTERVAL_SECS` | `3600`                  |
    /// | `MIN_PASSWORD_LENGTH`           | `8`                     |
    ///
    /// # Panics
    ///
    /// Panics on unparseable values and on a missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let db_acquire_timeout_secs: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_SECS must be a valid u64");

        let session_cleanup_interval_secs: u64 = std::env::var("SESSION_CLEANUP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SESSION_CLEANUP_INTERVAL_SECS must be a valid u64");

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_acquire_timeout_secs,
            session_cleanup_interval_secs,
            min_password_length,
            jwt,
        }
    }
}
