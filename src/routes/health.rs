use crate::error::AppResult;
use crate::routes::types::{HealthCheckResponse, HealthStatus};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use super::AppState;

async fn probe(check: impl Future<Output = AppResult<()>>) -> HealthStatus {
    let start = Instant::now();

    match tokio::time::timeout(StdDuration::from_secs(5), check).await {
        Ok(Ok(())) => HealthStatus {
            status: "healthy".to_string(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Ok(Err(e)) => {
            tracing::warn!("Health probe failed: {}", e);
            HealthStatus {
                status: "unhealthy".to_string(),
                latency_ms: None,
            }
        }
        Err(_) => HealthStatus {
            status: "unhealthy".to_string(),
            latency_ms: None,
        },
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let (database, log_store) = tokio::join!(probe(state.urls.ping()), probe(state.logs.ping()));

    let overall_status = if database.is_healthy() && log_store.is_healthy() {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(HealthCheckResponse {
        status: overall_status.to_string(),
        database,
        log_store,
        timestamp: chrono::Utc::now(),
    }))
}
