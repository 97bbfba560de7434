//! Request extractors: authenticated identity and validated JSON bodies.

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::state::AppState;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use validator::Validate;

use super::helpers::{bearer_token, first_field_error, json_rejection};

/// The user behind a required bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// The user behind an optional bearer token.
///
/// A missing or unusable token yields an anonymous request.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<User>);

async fn authenticate(token: &str, state: &AppState) -> AppResult<User> {
    let claims = state.auth_service.validate_token(token)?;
    let user_id = claims.user_id()?;

    let user = state
        .users
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if !user.is_active {
        return Err(AppError::Unauthorized("User account is inactive".to_string()));
    }

    Ok(user)
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?
            .ok_or_else(|| AppError::Unauthorized("Missing authorization token".to_string()))?;

        authenticate(token, state).await.map(AuthUser)
    }
}

impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(&parts.headers) {
            Ok(Some(token)) => token,
            Ok(None) | Err(_) => return Ok(MaybeAuthUser(None)),
        };

        match authenticate(token, state).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(AppError::Unauthorized(reason)) => {
                tracing::debug!(%reason, "Ignoring unusable token on optional auth");
                Ok(MaybeAuthUser(None))
            }
            Err(e) => Err(e),
        }
    }
}

/// A JSON body that passed its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value.validate().map_err(first_field_error)?;

        Ok(ValidatedJson(value))
    }
}
