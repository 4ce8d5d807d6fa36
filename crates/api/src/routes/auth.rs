//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login            -> login
/// POST /refresh          -> refresh
/// POST /logout           -> logout (requires auth)
/// POST /logout-all       -> logout_all (requires auth)
/// POST /change-password  -> change_password (requires auth)
/// GET  /me               -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/logout-all", post(auth::logout_all))
        .route("/change-password", post(auth::change_password))
        .route("/me", get(auth::me))
}
