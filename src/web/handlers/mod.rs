//! API handlers for the Web API.

pub mod auth;
pub mod file;
pub mod folder;

pub use auth::*;
pub use file::*;
pub use folder::*;

use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::db::Database;
use crate::storage::ObjectStore;
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Object store for blobs.
    pub store: Arc<ObjectStore>,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub token_expiry: u64,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Arc<Database>,
        store: Arc<ObjectStore>,
        jwt_secret: &str,
        token_expiry: u64,
        max_upload_size: u64,
    ) -> Self {
        Self {
            db,
            store,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry,
            max_upload_size,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user_id: i64, email: &str) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }
}
