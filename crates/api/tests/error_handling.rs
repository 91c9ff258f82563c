//! Tests for `AppError` -> HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use assert_matches::assert_matches;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use webaction_api::error::AppError;
use webaction_core::campaign::DenialReason;
use webaction_core::error::CoreError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::NotFound maps to 404 with NOT_FOUND code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Campaign",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Campaign with id 42 not found");
}

// ---------------------------------------------------------------------------
// Test: unknown campaign token maps to 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn campaign_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::CampaignNotFound).await;

    assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Campaign not found");
}

// ---------------------------------------------------------------------------
// Test: AppError::BadRequest maps to 400 with BAD_REQUEST code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("quantity must be at least 1".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "quantity must be at least 1");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("max_total must be positive".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Conflict maps to 409 with CONFLICT code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict(
        "Order status cannot move from synced to pending_sync".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Test: admission denials carry their reason code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upcoming_denial_returns_403_with_code() {
    let (status, json) = error_to_response(AppError::Denied(DenialReason::Upcoming)).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "UPCOMING");
    assert_eq!(json["error"], "This campaign has not started yet");
}

#[tokio::test]
async fn access_denied_returns_403() {
    let (status, json) = error_to_response(AppError::Denied(DenialReason::AccessDenied)).await;

    assert_eq!(status, axum::http::StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "ACCESS_DENIED");
}

#[tokio::test]
async fn exhausted_quotas_return_409() {
    let (status, json) =
        error_to_response(AppError::Denied(DenialReason::QuotasExhausted)).await;

    assert_eq!(status, axum::http::StatusCode::CONFLICT);
    assert_eq!(json["code"], "QUOTAS_EXHAUSTED");
}

// ---------------------------------------------------------------------------
// Test: missing session maps to 401 SESSION_EXPIRED
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_expired_returns_401() {
    let (status, json) = error_to_response(AppError::SessionExpired).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "SESSION_EXPIRED");
}

// ---------------------------------------------------------------------------
// Test: AppError::InternalError maps to 500 and sanitizes the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    // The response body must NOT contain the original error details.
    let body_text = json.to_string();
    assert!(
        !body_text.contains("secret"),
        "Internal error response must not leak sensitive details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: CoreError converts into AppError via From
// ---------------------------------------------------------------------------

#[tokio::test]
async fn core_error_converts_into_app_error() {
    let err = AppError::from(CoreError::Validation("bad input".into()));
    assert_matches!(err, AppError::Core(CoreError::Validation(_)));
}
