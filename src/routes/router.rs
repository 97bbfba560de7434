use crate::config::{CorsConfig, RateLimitConfig};
use crate::error::{AppError, AppResult};
use crate::middleware_impls::{
    request_context_middleware, request_id_middleware, timeout_middleware, ClientIpKeyExtractor,
};
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::auth_handlers;
use super::health;
use super::log_handlers;
use super::url_handlers;
use super::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<http::HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse::<http::HeaderValue>().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create application router
pub fn create_router(
    state: Arc<AppState>,
    cors_config: &CorsConfig,
    rate_limit_config: RateLimitConfig,
) -> AppResult<axum::Router> {
    // Strict limits for credential endpoints
    let governor_layer_strict = GovernorLayer::new(Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(rate_limit_config.replenish_interval_ms())
            .burst_size(rate_limit_config.burst_size)
            .key_extractor(ClientIpKeyExtractor)
            .finish()
            .ok_or_else(|| AppError::Configuration("Invalid strict rate limit".to_string()))?,
    ));

    // Twice the allowance for creation endpoints
    let governor_layer_lenient = GovernorLayer::new(Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond((rate_limit_config.replenish_interval_ms() / 2).max(1))
            .burst_size(rate_limit_config.burst_size.saturating_mul(2))
            .key_extractor(ClientIpKeyExtractor)
            .finish()
            .ok_or_else(|| AppError::Configuration("Invalid lenient rate limit".to_string()))?,
    ));

    let credential_routes = axum::Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .layer(governor_layer_strict);

    let creation_routes = axum::Router::new()
        .route("/urls", post(url_handlers::create_url))
        .route("/logs", post(log_handlers::create_log))
        .layer(governor_layer_lenient);

    let url_routes = axum::Router::new()
        .route("/profile", get(auth_handlers::profile))
        .route("/urls", get(url_handlers::list_urls))
        .route(
            "/urls/{id}",
            axum::routing::patch(url_handlers::update_url).delete(url_handlers::delete_url),
        )
        .route("/{code}", get(url_handlers::redirect));

    let log_routes = axum::Router::new()
        .route("/logs/paginated/body", get(log_handlers::list_logs_body))
        .route("/logs/paginated/header", get(log_handlers::list_logs_header))
        .route("/logs/period/body", get(log_handlers::period_logs_body))
        .route("/logs/period/header", get(log_handlers::period_logs_header))
        .route("/logs/search", get(log_handlers::search_logs))
        .route("/logs/query", get(log_handlers::query_logs))
        .route("/logs/{id}", get(log_handlers::get_log));

    // Health check endpoint (no rate limiting)
    let health_routes = axum::Router::new().route("/_health", get(health::health_check));

    // Layers added last run first
    Ok(credential_routes
        .merge(creation_routes)
        .merge(url_routes)
        .merge(log_routes)
        .merge(health_routes)
        .layer(middleware::from_fn_with_state(state.clone(), timeout_middleware))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors_layer(cors_config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_context_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state))
}
