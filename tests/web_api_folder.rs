//! Web API Folder Tests
//!
//! Integration tests for folder creation and listing.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{create_test_context, signup_and_token};

#[tokio::test]
async fn test_create_root_folder() {
    let ctx = create_test_context().await;
    let token = signup_and_token(&ctx.server, "alice@example.com").await;

    let response = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&token)
        .json(&json!({ "name": "documents" }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["name"], "documents");
    assert!(body["data"]["parent_id"].is_null() || body["data"].get("parent_id").is_none());
}

#[tokio::test]
async fn test_create_nested_folder() {
    let ctx = create_test_context().await;
    let token = signup_and_token(&ctx.server, "alice@example.com").await;

    let parent: Value = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&token)
        .json(&json!({ "name": "documents" }))
        .await
        .json();
    let parent_id = parent["data"]["id"].as_i64().unwrap();

    let response = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&token)
        .json(&json!({ "name": "2026", "parent_id": parent_id }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["parent_id"], parent_id);
}

#[tokio::test]
async fn test_create_folder_requires_auth() {
    let ctx = create_test_context().await;

    let response = ctx
        .server
        .post("/api/folders")
        .json(&json!({ "name": "documents" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_folder_rejects_bad_names() {
    let ctx = create_test_context().await;
    let token = signup_and_token(&ctx.server, "alice@example.com").await;

    for name in ["", "a/b", "..", "bad\nname"] {
        let response = ctx
            .server
            .post("/api/folders")
            .authorization_bearer(&token)
            .json(&json!({ "name": name }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_create_folder_under_missing_parent() {
    let ctx = create_test_context().await;
    let token = signup_and_token(&ctx.server, "alice@example.com").await;

    let response = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&token)
        .json(&json!({ "name": "orphan", "parent_id": 9999 }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_folder_under_foreign_parent_forbidden() {
    let ctx = create_test_context().await;
    let alice = signup_and_token(&ctx.server, "alice@example.com").await;
    let bob = signup_and_token(&ctx.server, "bob@example.com").await;

    let bobs: Value = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&bob)
        .json(&json!({ "name": "bobs-folder" }))
        .await
        .json();
    let bobs_id = bobs["data"]["id"].as_i64().unwrap();

    let response = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&alice)
        .json(&json!({ "name": "sneaky", "parent_id": bobs_id }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_folders_per_level() {
    let ctx = create_test_context().await;
    let token = signup_and_token(&ctx.server, "alice@example.com").await;

    let root: Value = ctx
        .server
        .post("/api/folders")
        .authorization_bearer(&token)
        .json(&json!({ "name": "root" }))
        .await
        .json();
    let root_id = root["data"]["id"].as_i64().unwrap();

    for name in ["child-a", "child-b"] {
        ctx.server
            .post("/api/folders")
            .authorization_bearer(&token)
            .json(&json!({ "name": name, "parent_id": root_id }))
            .await
            .assert_status_ok();
    }

    // Top level has exactly one folder
    let top: Value = ctx
        .server
        .get("/api/folders")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(top["data"].as_array().unwrap().len(), 1);

    // Children are listed only under their parent
    let children: Value = ctx
        .server
        .get(&format!("/api/folders?parent_id={root_id}"))
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(children["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_folders_scoped_to_owner() {
    let ctx = create_test_context().await;
    let alice = signup_and_token(&ctx.server, "alice@example.com").await;
    let bob = signup_and_token(&ctx.server, "bob@example.com").await;

    ctx.server
        .post("/api/folders")
        .authorization_bearer(&alice)
        .json(&json!({ "name": "alices" }))
        .await
        .assert_status_ok();

    let bobs_view: Value = ctx
        .server
        .get("/api/folders")
        .authorization_bearer(&bob)
        .await
        .json();

    assert!(bobs_view["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_folder_names_allowed() {
    let ctx = create_test_context().await;
    let token = signup_and_token(&ctx.server, "alice@example.com").await;

    for _ in 0..2 {
        ctx.server
            .post("/api/folders")
            .authorization_bearer(&token)
            .json(&json!({ "name": "same-name" }))
            .await
            .assert_status_ok();
    }

    let top: Value = ctx
        .server
        .get("/api/folders")
        .authorization_bearer(&token)
        .await
        .json();
    assert_eq!(top["data"].as_array().unwrap().len(), 2);
}
