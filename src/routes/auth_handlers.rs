use crate::auth::{hash_password, verify_password, LoginRequest, LoginResponse};
use crate::error::{AppError, AppResult};
use crate::models::{NewUser, RegisterRequest, UserResponse};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use std::sync::Arc;

use super::extract::{AuthUser, ValidatedJson};
use super::AppState;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create a user account
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let email = normalize_email(&payload.email);

    if state.users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash_password(payload.password, state.bcrypt_cost).await?;

    let user = state
        .users
        .create_user(NewUser {
            name: payload.name.trim().to_string(),
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login to get JWT token
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = state
        .users
        .find_user_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(payload.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is inactive".to_string()));
    }

    let token = state.auth_service.generate_token(user.id, &user.email)?;

    Ok(Json(LoginResponse { token }))
}

/// The authenticated user's profile
pub async fn profile(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
