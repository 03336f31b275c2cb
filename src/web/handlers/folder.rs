//! Folder handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::vault::FolderTree;
use crate::web::dto::{ApiResponse, CreateFolderRequest, FolderListQuery, FolderResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/folders - Create a folder.
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Json(req): Json<CreateFolderRequest>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    let tree = FolderTree::new(state.db.pool());
    let folder = tree
        .create(claims.sub, &req.name, req.parent_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::new(folder.into())))
}

/// GET /api/folders - List folders at one tree level.
///
/// `?parent_id=N` lists children of folder N; without it, root-level
/// folders.
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Query(query): Query<FolderListQuery>,
) -> Result<Json<ApiResponse<Vec<FolderResponse>>>, ApiError> {
    let tree = FolderTree::new(state.db.pool());
    let folders = tree
        .list(claims.sub, query.parent_id)
        .await
        .map_err(ApiError::from)?;

    let responses = folders.into_iter().map(FolderResponse::from).collect();
    Ok(Json(ApiResponse::new(responses)))
}
