#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use vitalis_core::clock::Clock;

use vitalis_api::auth::jwt::JwtConfig;
use vitalis_api::auth::password::hash_password;
use vitalis_api::config::ServerConfig;
use vitalis_api::router::build_app_router;
use vitalis_api::state::AppState;
use vitalis_db::models::user::{CreateUser, User};
use vitalis_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_acquire_timeout_secs: 5,
        session_cleanup_interval_secs: 3600,
        min_password_length: 8,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 30,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

/// Same as [`build_test_app`], driven by the given clock.
pub fn build_test_app_with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Router {
    build_app_router(AppState::with_clock(pool, test_config(), clock))
}

/// Insert an active user with an Argon2 password hash.
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str) -> User {
    let hashed = hash_password(password).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            user_name: "Asha Rao".to_string(),
            email_id: email.to_string(),
            mobile_num: "5550100".to_string(),
            city: "Pune".to_string(),
            hashed_password: Some(hashed),
        },
    )
    .await
    .expect("user creation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
