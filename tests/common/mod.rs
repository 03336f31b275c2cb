//! Test helpers for Web API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use cloudvault::config::Config;
use cloudvault::storage::ObjectStore;
use cloudvault::web::handlers::AppState;
use cloudvault::web::middleware::JwtState;
use cloudvault::web::router::{create_health_router, create_router};
use cloudvault::Database;

/// A running test server plus the stores behind it.
///
/// The temp directory must stay alive as long as the object store does.
pub struct TestContext {
    pub server: TestServer,
    pub db: Arc<Database>,
    pub store: Arc<ObjectStore>,
    _tmp: TempDir,
}

/// Create a test configuration.
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.auth.jwt_secret = "test-secret-key-for-testing-only".to_string();
    config.auth.token_expiry_secs = 900;
    config.storage.max_upload_size_mb = 1;
    config
}

/// Create a test server with an in-memory database and temp blob store.
pub async fn create_test_context() -> TestContext {
    let config = create_test_config();

    let db = Arc::new(
        Database::open_in_memory()
            .await
            .expect("Failed to create test database"),
    );

    let tmp = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(
        ObjectStore::new(
            tmp.path(),
            &config.storage.public_base_url,
            &config.auth.jwt_secret,
        )
        .expect("Failed to create object store"),
    );

    let app_state = Arc::new(AppState::new(
        db.clone(),
        store.clone(),
        &config.auth.jwt_secret,
        config.auth.token_expiry_secs,
        config.max_upload_size_bytes(),
    ));

    let jwt_state = Arc::new(JwtState::new(&config.auth.jwt_secret));

    let router = create_router(app_state, jwt_state, &config.auth.cors_origins)
        .merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");

    TestContext {
        server,
        db,
        store,
        _tmp: tmp,
    }
}

/// Sign up a test user and return the response body.
pub async fn signup_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/signup")
        .json(&json!({
            "email": email,
            "password": password,
            "name": "Test User"
        }))
        .await;

    response.json::<Value>()
}

/// Get access token from an auth response.
pub fn get_access_token(response: &Value) -> String {
    response["data"]["access_token"]
        .as_str()
        .expect("missing access_token")
        .to_string()
}

/// Get user ID from an auth response.
pub fn get_user_id(response: &Value) -> i64 {
    response["data"]["user"]["id"]
        .as_i64()
        .expect("missing user id")
}

/// Sign up a user and return just the bearer token.
pub async fn signup_and_token(server: &TestServer, email: &str) -> String {
    let body = signup_user(server, email, "password123").await;
    get_access_token(&body)
}

/// Build a multipart/form-data body with a single file part and an
/// optional folder_id part.
pub fn multipart_upload_body(
    boundary: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    folder_id: Option<i64>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(b"\r\n");

    if let Some(id) = folder_id {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\n\
                 Content-Disposition: form-data; name=\"folder_id\"\r\n\r\n\
                 {id}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Boundary used by the multipart helpers.
pub const TEST_BOUNDARY: &str = "cloudvault-test-boundary";

/// Upload a file through the API and return the response body.
pub async fn upload_file(
    server: &TestServer,
    token: &str,
    filename: &str,
    content_type: &str,
    bytes: &[u8],
    folder_id: Option<i64>,
) -> Value {
    let body = multipart_upload_body(TEST_BOUNDARY, filename, content_type, bytes, folder_id);

    let response = server
        .post("/api/files/upload")
        .authorization_bearer(token)
        .content_type(&format!("multipart/form-data; boundary={TEST_BOUNDARY}"))
        .bytes(body.into())
        .await;

    response.json::<Value>()
}
