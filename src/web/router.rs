//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_folder, delete_file, download_file, list_files, list_folders, login, me, rename_file,
    share_file, shared_download, signup, upload_file, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    let auth_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/me", get(me));

    let folder_routes = Router::new()
        .route("/", post(create_folder).get(list_folders));

    let file_routes = Router::new()
        .route("/upload", post(upload_file))
        .route("/", get(list_files))
        .route("/:id/download", get(download_file))
        .route("/:id/rename", put(rename_file))
        .route("/:id", delete(delete_file))
        .route("/:id/share", post(share_file));

    // Share links authenticate by signature, not by token
    let shared_routes = Router::new().route("/:expires/:sig/*path", get(shared_download));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/folders", folder_routes)
        .nest("/files", file_routes)
        .nest("/shared", shared_routes);

    // Clone jwt_state for the middleware closure
    let jwt_state_for_middleware = jwt_state.clone();

    // Multipart framing adds overhead on top of the file itself
    let body_limit = app_state.max_upload_size as usize + 64 * 1024;

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                }))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }
}
