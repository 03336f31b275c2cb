//! File handlers for the Web API.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::db::FileRepository;
use crate::vault::FileManager;
use crate::web::dto::{
    ApiResponse, FileListQuery, FileResponse, RenameFileRequest, ShareFileRequest, ShareResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Sanitizes the filename to prevent header injection and uses RFC 5987
/// encoding for non-ASCII filenames.
fn content_disposition_header(filename: &str) -> String {
    // Sanitize filename for the basic filename parameter (ASCII fallback)
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control()) // Remove control characters (CR, LF, etc.)
        .map(|c| match c {
            '"' => '_',  // Replace double quotes
            '\\' => '_', // Replace backslashes
            _ => c,
        })
        .collect();

    // For ASCII-only filenames, use simple format
    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    // Use RFC 5987 filename* parameter with UTF-8 encoding
    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Build a download response from a record and its bytes.
fn download_response(
    name: &str,
    mime_type: &str,
    bytes: Vec<u8>,
) -> Result<Response<Body>, ApiError> {
    Response::builder()
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_DISPOSITION, content_disposition_header(name))
        .header(header::CONTENT_LENGTH, bytes.len())
        .body(Body::from(bytes))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// POST /api/files/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" part and an optional
/// "folder_id" part. The MIME type is taken from the file part's declared
/// content type.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let mut filename: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut folder_id: Option<i64> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::debug!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                mime_type = field.content_type().map(|s| s.to_string());
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            tracing::debug!("Failed to read file content: {}", e);
                            ApiError::bad_request("Failed to read file")
                        })?
                        .to_vec(),
                );
            }
            "folder_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| ApiError::bad_request("Invalid folder_id"))?;
                folder_id = Some(
                    text.parse()
                        .map_err(|_| ApiError::bad_request("folder_id must be an integer"))?,
                );
            }
            _ => {}
        }
    }

    let filename = filename.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let content = content.ok_or_else(|| ApiError::bad_request("No file content"))?;
    let mime_type =
        mime_type.ok_or_else(|| ApiError::bad_request("File part must declare a content type"))?;

    if content.len() as u64 > state.max_upload_size {
        let max_mb = state.max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    let manager = FileManager::new(state.db.pool(), &state.store);
    let file = manager
        .upload(claims.sub, folder_id, &mime_type, &filename, &content)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(file.into())))
}

/// GET /api/files - List files at one folder level.
///
/// `?folder_id=N` lists files in folder N; without it, root-level files.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<FileListQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let manager = FileManager::new(state.db.pool(), &state.store);
    let files = manager
        .list(claims.sub, query.folder_id)
        .await
        .map_err(ApiError::from)?;

    let responses = files.into_iter().map(FileResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}

/// GET /api/files/:id/download - Download a file.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Response<Body>, ApiError> {
    let manager = FileManager::new(state.db.pool(), &state.store);
    let (file, bytes) = manager
        .download(claims.sub, file_id)
        .await
        .map_err(ApiError::from)?;

    download_response(&file.name, &file.mime_type, bytes)
}

/// PUT /api/files/:id/rename - Rename a file.
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
    Json(req): Json<RenameFileRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let manager = FileManager::new(state.db.pool(), &state.store);
    let file = manager
        .rename(claims.sub, file_id, &req.name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(file.into())))
}

/// DELETE /api/files/:id - Delete a file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let manager = FileManager::new(state.db.pool(), &state.store);
    manager
        .delete(claims.sub, file_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(())))
}

/// POST /api/files/:id/share - Issue a time-limited share link.
pub async fn share_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(file_id): Path<i64>,
    Json(req): Json<ShareFileRequest>,
) -> Result<Json<ApiResponse<ShareResponse>>, ApiError> {
    let manager = FileManager::new(state.db.pool(), &state.store);
    let signed = manager
        .share(claims.sub, file_id, req.expires_in_secs)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(ShareResponse {
        url: signed.url,
        expires_at: signed.expires_at,
    })))
}

/// GET /api/shared/:expires/:sig/*path - Serve a share link (no auth).
///
/// The signature binds the storage path and expiry to the signing secret.
/// Verification happens before any store access, so an invalid link learns
/// nothing about what exists.
pub async fn shared_download(
    State(state): State<Arc<AppState>>,
    Path((expires_at, sig, storage_path)): Path<(i64, String, String)>,
) -> Result<Response<Body>, ApiError> {
    state
        .store
        .verify(&storage_path, expires_at, &sig)
        .map_err(ApiError::from)?;

    let bytes = state.store.get(&storage_path).map_err(ApiError::from)?;

    // Serve the logical name and recorded MIME type when the record still
    // exists; fall back to the physical filename otherwise.
    let record = FileRepository::new(state.db.pool())
        .get_by_storage_path(&storage_path)
        .await
        .map_err(ApiError::from)?;

    match record {
        Some(file) => download_response(&file.name, &file.mime_type, bytes),
        None => {
            let fallback = storage_path
                .rsplit('/')
                .next()
                .unwrap_or("download");
            let mime = mime_guess::from_path(fallback)
                .first_or_octet_stream()
                .to_string();
            download_response(fallback, &mime, bytes)
        }
    }
}
