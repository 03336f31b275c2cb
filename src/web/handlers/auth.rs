//! Authentication handlers.

use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

use crate::auth::{hash_password, validate_password, verify_password};
use crate::db::{NewUser, UserRepository};
use crate::web::dto::{
    ApiResponse, AuthResponse, LoginRequest, MeResponse, SignupRequest, UserInfo,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/auth/signup - Create an account.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    req.validate().map_err(ApiError::from_validation_errors)?;

    validate_password(&req.password)
        .map_err(|e| ApiError::bad_request(format!("Password error: {}", e)))?;

    let password_hash =
        hash_password(&req.password).map_err(|_| ApiError::internal("Failed to hash password"))?;

    let repo = UserRepository::new(state.db.pool());

    // Pre-check so the common case gets a clean conflict instead of a
    // constraint error. The unique index still backstops races.
    if repo
        .get_by_email(&req.email)
        .await
        .map_err(ApiError::from)?
        .is_some()
    {
        return Err(ApiError::conflict("Email already registered"));
    }

    let mut new_user = NewUser::new(&req.email, password_hash);
    if let Some(ref name) = req.name {
        new_user = new_user.with_name(name);
    }

    let user = repo.create(&new_user).await.map_err(|e| {
        if e.to_string().contains("UNIQUE") {
            ApiError::conflict("Email already registered")
        } else {
            tracing::error!("User creation failed: {}", e);
            ApiError::internal("Failed to create user")
        }
    })?;

    tracing::info!(user_id = user.id, "user signed up");

    let access_token = state.generate_access_token(user.id, &user.email)?;

    Ok(Json(ApiResponse::new(AuthResponse {
        access_token,
        expires_in: state.token_expiry,
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    })))
}

/// POST /api/auth/login - User login.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    // Same message for unknown email and wrong password so login attempts
    // cannot probe which emails are registered.
    let user = UserRepository::new(state.db.pool())
        .get_by_email(&req.email)
        .await
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    verify_password(&req.password, &user.password)
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?;

    let access_token = state.generate_access_token(user.id, &user.email)?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(ApiResponse::new(AuthResponse {
        access_token,
        expires_in: state.token_expiry,
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    })))
}

/// GET /api/auth/me - Get current user info.
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(claims.sub)
        .await
        .map_err(|_| ApiError::internal("Database error"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    })))
}
