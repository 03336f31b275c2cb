//! Web API Authentication Tests
//!
//! Integration tests for signup, login and the current-user endpoint.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{create_test_context, get_access_token, signup_user};

// ============================================================================
// Signup Tests
// ============================================================================

#[tokio::test]
async fn test_signup_success() {
    let ctx = create_test_context().await;

    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "alice@example.com",
            "password": "password123",
            "name": "Alice"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["access_token"].is_string());
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
    assert_eq!(body["data"]["user"]["name"], "Alice");
    // Password material never appears in responses
    let raw = serde_json::to_string(&body).unwrap();
    assert!(!raw.contains("password"));
}

#[tokio::test]
async fn test_signup_duplicate_email() {
    let ctx = create_test_context().await;

    signup_user(&ctx.server, "dup@example.com", "password123").await;

    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "dup@example.com",
            "password": "password456"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_signup_duplicate_email_case_insensitive() {
    let ctx = create_test_context().await;

    signup_user(&ctx.server, "Case@Example.com", "password123").await;

    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "case@example.com",
            "password": "password456"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_invalid_email() {
    let ctx = create_test_context().await;

    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "not-an-email",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_short_password() {
    let ctx = create_test_context().await;

    let response = ctx
        .server
        .post("/api/auth/signup")
        .json(&json!({
            "email": "short@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let ctx = create_test_context().await;

    signup_user(&ctx.server, "bob@example.com", "password123").await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "bob@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["access_token"].is_string());
    assert_eq!(body["data"]["user"]["email"], "bob@example.com");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let ctx = create_test_context().await;

    signup_user(&ctx.server, "bob@example.com", "password123").await;

    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "bob@example.com",
            "password": "wrong-password"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_unknown_email_same_error_as_wrong_password() {
    let ctx = create_test_context().await;

    signup_user(&ctx.server, "bob@example.com", "password123").await;

    let wrong_password = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "bob@example.com",
            "password": "wrong-password"
        }))
        .await;
    wrong_password.assert_status(StatusCode::UNAUTHORIZED);

    let unknown_email = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .await;
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);

    // Indistinguishable bodies: login cannot probe which emails exist
    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a["error"]["message"], b["error"]["message"]);
}

// ============================================================================
// Current User Tests
// ============================================================================

#[tokio::test]
async fn test_me_with_valid_token() {
    let ctx = create_test_context().await;

    let signup = signup_user(&ctx.server, "carol@example.com", "password123").await;
    let token = get_access_token(&signup);

    let response = ctx
        .server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["email"], "carol@example.com");
    assert!(body["data"]["created_at"].is_string());
}

#[tokio::test]
async fn test_me_without_token() {
    let ctx = create_test_context().await;

    let response = ctx.server.get("/api/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_garbage_token() {
    let ctx = create_test_context().await;

    let response = ctx
        .server
        .get("/api/auth/me")
        .authorization_bearer("not-a-jwt")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Health Check
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_is_public() {
    let ctx = create_test_context().await;

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
