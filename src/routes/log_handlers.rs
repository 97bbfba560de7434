use crate::error::{AppError, AppResult};
use crate::logs::{CreateLogRequest, LogRecord};
use crate::services::pagination::{Page, Paginated, PaginationMode};
use crate::services::query::LogQuery;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use super::extract::{AuthUser, ValidatedJson};
use super::AppState;

type Params = Query<HashMap<String, String>>;

async fn run(state: &AppState, query: LogQuery) -> AppResult<Paginated<LogRecord>> {
    let (records, total) = state.logs.find_logs(query.filter, query.page).await?;
    let page = Page::new(records, total, &query.page).require_items("No logs found")?;

    Ok(Paginated::new(page, query.mode, "logs"))
}

/// Store a log record
pub async fn create_log(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateLogRequest>,
) -> AppResult<impl IntoResponse> {
    let record = state.logs.insert_log(payload.into_record(Utc::now())).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_log(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .logs
        .find_log(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Log not found".to_string()))?;

    Ok(Json(record))
}

pub async fn list_logs_body(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Params,
) -> AppResult<impl IntoResponse> {
    run(&state, LogQuery::all(params.into(), PaginationMode::Body, &state.pagination)?).await
}

pub async fn list_logs_header(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Params,
) -> AppResult<impl IntoResponse> {
    run(&state, LogQuery::all(params.into(), PaginationMode::Header, &state.pagination)?).await
}

pub async fn period_logs_body(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Params,
) -> AppResult<impl IntoResponse> {
    run(&state, LogQuery::period(params.into(), PaginationMode::Body, &state.pagination)?).await
}

pub async fn period_logs_header(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Params,
) -> AppResult<impl IntoResponse> {
    run(&state, LogQuery::period(params.into(), PaginationMode::Header, &state.pagination)?).await
}

/// Exact-match search on `ip`, `user` and `description`
pub async fn search_logs(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Params,
) -> AppResult<impl IntoResponse> {
    run(&state, LogQuery::search(params.into(), &state.pagination)?).await
}

/// Any combination of filters, with the envelope picked by `paginated`
pub async fn query_logs(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(params): Params,
) -> AppResult<impl IntoResponse> {
    run(&state, LogQuery::dynamic(params.into(), &state.pagination)?).await
}
