//! CloudVault - multi-tenant file storage service.
//!
//! Per-user hierarchical file storage behind a REST API: metadata in
//! SQLite, blobs in a filesystem object store, JWT authentication and
//! signed share links.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod storage;
pub mod vault;
pub mod web;

pub use auth::{hash_password, validate_password, verify_password, PasswordError};
pub use config::Config;
pub use db::Database;
pub use error::{Result, VaultError};
pub use storage::{ObjectStore, SignedUrl};
pub use vault::{FileManager, FolderTree, PathResolver, ALLOWED_MIME_TYPES};
pub use web::WebServer;
