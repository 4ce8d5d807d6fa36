pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/logout-all                                 logout everywhere (requires auth)
/// /auth/change-password                            change password (requires auth)
/// /auth/me                                         current identity (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/auth", auth::router())
}
