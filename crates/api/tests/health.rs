//! Integration tests for the root-level health endpoint and shared middleware.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_ok(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("x-request-id"),
        "request id should be propagated to the response"
    );

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_degraded_when_pool_closed(pool: PgPool) {
    let app = build_test_app(pool.clone());
    pool.close().await;

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
