//! Request DTOs for the Web API.

use serde::Deserialize;
use validator::Validate;

/// Signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Email address (login identity).
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Password (plaintext; hashed server-side).
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
    /// Display name (optional).
    #[serde(default)]
    #[validate(length(max = 64, message = "Name must be at most 64 characters"))]
    pub name: Option<String>,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Folder creation request.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for a root-level folder).
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Folder listing query parameters.
#[derive(Debug, Deserialize)]
pub struct FolderListQuery {
    /// Parent folder to list under (None lists root-level folders).
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// File listing query parameters.
#[derive(Debug, Deserialize)]
pub struct FileListQuery {
    /// Folder to list (None lists root-level files).
    #[serde(default)]
    pub folder_id: Option<i64>,
}

/// File rename request.
#[derive(Debug, Deserialize)]
pub struct RenameFileRequest {
    /// New logical filename.
    pub name: String,
}

/// Share link request.
#[derive(Debug, Deserialize)]
pub struct ShareFileRequest {
    /// Link lifetime in seconds. Defaults to one hour.
    #[serde(default = "default_share_expiry")]
    pub expires_in_secs: u64,
}

fn default_share_expiry() -> u64 {
    3600
}
