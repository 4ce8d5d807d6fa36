use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vitalis_core::error::CoreError;

/// Message returned for every authentication failure, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vitalis_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Unauthorized(reason) => {
                    // The reason stays in the logs; clients cannot tell causes apart.
                    tracing::debug!(reason = %reason, "Rejecting unauthenticated request");
                    let body = json!({ "error": INVALID_CREDENTIALS, "code": "UNAUTHORIZED" });
                    let mut response = (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response();
                    response
                        .headers_mut()
                        .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                    return response;
                }
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": msg, "code": "VALIDATION_ERROR" }),
                ),
                CoreError::InvalidFields(fields) => (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Validation failed",
                        "code": "VALIDATION_ERROR",
                        "fields": fields,
                    }),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "error": "An internal error occurred", "code": "INTERNAL_ERROR" }),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "code": "BAD_REQUEST" }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
