//! Data transfer objects for the Web API.

pub mod request;
pub mod response;

pub use request::{
    CreateFolderRequest, FileListQuery, FolderListQuery, LoginRequest, RenameFileRequest,
    ShareFileRequest, SignupRequest,
};
pub use response::{
    ApiResponse, AuthResponse, FileResponse, FolderResponse, MeResponse, ShareResponse, UserInfo,
};
