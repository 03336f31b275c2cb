//! Error types for CloudVault.

use thiserror::Error;

/// Common error type for CloudVault.
///
/// Variants map 1:1 to the error taxonomy surfaced at the API boundary.
/// All store-layer failures are wrapped into one of these; the core never
/// retries.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Missing or invalid credential.
    #[error("authentication error: {0}")]
    Unauthenticated(String),

    /// Valid credential, wrong owner.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    ///
    /// Also used for owner mismatches on file lookups so that a non-owner
    /// cannot distinguish "not yours" from "does not exist".
    #[error("{0} not found")]
    NotFound(String),

    /// Missing or invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// MIME type outside the allowed upload set.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Storage path collision (create-only put hit an existing object).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Database error.
    ///
    /// Wraps errors from the metadata store. sqlx errors convert
    /// automatically.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error from the object store backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for VaultError {
    fn from(e: sqlx::Error) -> Self {
        VaultError::Database(e.to_string())
    }
}

/// Result type alias for CloudVault operations.
pub type Result<T> = std::result::Result<T, VaultError>;
