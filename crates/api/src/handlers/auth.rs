//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use vitalis_core::error::CoreError;

use crate::auth::service::IdentitySummary;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validation::ValidatedJson;

/// Token scheme reported to clients.
const TOKEN_TYPE: &str = "bearer";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
    /// Client-supplied device label. Falls back to the `User-Agent` header.
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub device_info: Option<String>,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub refresh_token: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "is required"))]
    pub new_password: String,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user_info: IdentitySummary,
}

/// Response for a successful refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let Some(user) = state.auth.authenticate(&input.email, &input.password).await? else {
        tracing::warn!("Login rejected");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    };

    let device_info = input.device_info.or_else(|| user_agent(&headers));
    let issued = state.auth.issue_session(&user, device_info).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token: issued.access_token,
        refresh_token: issued.refresh_token,
        token_type: TOKEN_TYPE,
        expires_in: issued.expires_in,
        user_info: issued.user,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new access token. The refresh token itself
/// stays valid.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let refreshed = state
        .auth
        .refresh(&input.refresh_token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    Ok(Json(RefreshResponse {
        access_token: refreshed.access_token,
        token_type: TOKEN_TYPE,
        expires_in: refreshed.expires_in,
    }))
}

/// POST /api/v1/auth/logout
///
/// Revoke one of the caller's refresh sessions. Succeeds for unknown,
/// already-revoked, or foreign tokens (the latter are not touched); fails only
/// if the store write fails.
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth
        .revoke(&input.refresh_token, auth.user.id)
        .await
        .map_err(|e| store_write_failed(e, "Failed to logout"))?;

    tracing::info!(user_id = auth.user.id, "User logged out");
    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

/// POST /api/v1/auth/logout-all
///
/// Revoke every refresh session of the authenticated user.
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth
        .revoke_all(auth.user.id)
        .await
        .map_err(|e| store_write_failed(e, "Failed to logout from all devices"))?;

    Ok(Json(MessageResponse {
        message: "Logged out from all devices successfully",
    }))
}

/// POST /api/v1/auth/change-password
///
/// Verify the current password, store the new one, and revoke every session.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth
        .change_password(&auth.user, &input.current_password, &input.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully. Please login again.",
    }))
}

/// GET /api/v1/auth/me
///
/// Return the identity behind the presented access token.
pub async fn me(auth: AuthUser) -> Json<IdentitySummary> {
    Json(IdentitySummary::from(&auth.user))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.chars().take(255).collect())
}

/// Revocation store failures are reported as a failed request, not a 500.
fn store_write_failed(err: CoreError, message: &str) -> AppError {
    match err {
        CoreError::Internal(_) => AppError::BadRequest(message.to_string()),
        other => AppError::Core(other),
    }
}
