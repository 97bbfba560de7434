use crate::error::{AppError, AppResult};
use crate::models::{CreateUrlRequest, CreateUrlResponse, UpdateUrlRequest, UrlListItem};
use crate::services::pagination::{Page, Paginated, PaginationMode};
use crate::services::query::url_page_request;
use crate::services::short_code::ShortCodeGenerator;
use crate::util::{is_web_url, short_url};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect};
use std::collections::HashMap;
use std::sync::Arc;

use super::extract::{AuthUser, MaybeAuthUser, ValidatedJson};
use super::helpers::parse_id;
use super::AppState;

fn check_target(state: &AppState, url: &str) -> AppResult<()> {
    if state.strict_url_validation && !is_web_url(url) {
        return Err(AppError::InvalidField {
            field: "url".to_string(),
            message: "URL must start with http:// or https://".to_string(),
        });
    }
    Ok(())
}

/// Create a short URL, owned by the caller when a valid token is sent
pub async fn create_url(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    ValidatedJson(payload): ValidatedJson<CreateUrlRequest>,
) -> AppResult<impl IntoResponse> {
    check_target(&state, &payload.url)?;

    let user_id = user.map(|u| u.id);
    let entry = state
        .short_codes
        .create_url(state.urls.as_ref(), payload.url, user_id)
        .await?;

    tracing::info!(short_code = %entry.short_code, user_id = ?entry.user_id, "Short URL created");

    let response = CreateUrlResponse {
        url: short_url(&state.base_url, &entry.short_code),
        created_at: entry.created_at,
        user_id: entry.user_id,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Count a click and redirect to the original URL
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !ShortCodeGenerator::is_well_formed(&code) {
        return Err(AppError::NotFound("URL not found".to_string()));
    }

    let entry = state
        .urls
        .record_click(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("URL not found".to_string()))?;

    Ok(Redirect::temporary(&entry.original_url))
}

/// The caller's active short URLs, newest first
pub async fn list_urls(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    let request = url_page_request(params.into(), &state.pagination)?;

    let (entries, total) = state.urls.list_by_owner(user.id, request).await?;
    let page = Page::new(entries, total, &request)
        .require_items("No URLs found")?
        .map(|entry| UrlListItem::from_entry(entry, &state.base_url));

    Ok(Paginated::new(page, PaginationMode::Body, "urls"))
}

/// Point one of the caller's short URLs at a new target
pub async fn update_url(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUrlRequest>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "url")?;
    check_target(&state, &payload.url)?;

    let entry = state
        .urls
        .update_target(id, user.id, &payload.url)
        .await?
        .ok_or_else(|| AppError::NotFound("URL not found".to_string()))?;

    Ok(Json(UrlListItem::from_entry(entry, &state.base_url)))
}

/// Deactivate one of the caller's short URLs; its code stays taken
pub async fn delete_url(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id, "url")?;

    if !state.urls.deactivate(id, user.id).await? {
        return Err(AppError::NotFound("URL not found".to_string()));
    }

    tracing::info!(url_id = id, user_id = user.id, "Short URL deactivated");

    Ok(StatusCode::NO_CONTENT)
}
