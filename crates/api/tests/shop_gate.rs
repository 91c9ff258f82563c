//! Integration tests for routing and the session gate on the public flow.
//!
//! These run against the full router (production middleware stack) with a
//! lazy pool; every request here is rejected before any database access.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{body_json, build_test_app, get};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health responds with status fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_service_state() {
    let app = build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["status"].is_string());
    assert!(json["version"].is_string());
    assert!(json["db_healthy"].is_boolean());
}

// ---------------------------------------------------------------------------
// Test: unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: catalog without a session token is rejected with SESSION_EXPIRED
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_without_session_returns_401() {
    let app = build_test_app();
    let token = uuid::Uuid::new_v4();
    let response = get(app, &format!("/c/{token}/catalog")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SESSION_EXPIRED");
}

// ---------------------------------------------------------------------------
// Test: cart mutation without a session token is rejected
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cart_add_without_session_returns_401() {
    let app = build_test_app();
    let token = uuid::Uuid::new_v4();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(format!("/c/{token}/cart/add"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"product_code":"P100","quantity":1}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SESSION_EXPIRED");
}

// ---------------------------------------------------------------------------
// Test: a malformed session token is treated as expired, not a server error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_session_token_returns_401() {
    let app = build_test_app();
    let token = uuid::Uuid::new_v4();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/c/{token}/catalog"))
                .header("x-session-token", "not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SESSION_EXPIRED");
}

// ---------------------------------------------------------------------------
// Test: an unknown (but well-formed) session token is treated as expired
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_session_token_returns_401() {
    let app = build_test_app();
    let token = uuid::Uuid::new_v4();
    let bogus_session = uuid::Uuid::new_v4();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/c/{token}/catalog"))
                .header("x-session-token", bogus_session.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
