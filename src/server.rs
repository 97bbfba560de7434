//! Server startup and shutdown logic.
//!
//! `run_server` connects both stores, optionally runs migrations, builds the
//! application state and router, then serves until a shutdown signal.

use crate::auth::AuthService;
use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::log_store::MongoLogStore;
use crate::routes;
use crate::services::short_code::ShortCodeGenerator;
use crate::state::AppState;
use crate::store::LogStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Connect to PostgreSQL with the configured pool settings.
pub async fn connect_repository(config: &Config) -> AppResult<Repository> {
    Repository::new(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
        Duration::from_secs(config.database.acquire_timeout_seconds),
    )
    .await
}

/// Run the web server with the given configuration.
///
/// # Errors
///
/// Fails when a store cannot be reached, a migration fails, or the address
/// cannot be bound.
pub async fn run_server(config: Config, addr: String, should_migrate: bool) -> AppResult<()> {
    info!("Starting linkforge server...");

    info!("Connecting to database...");
    let repository = Arc::new(connect_repository(&config).await?);

    if should_migrate {
        info!("Running database migrations...");
        repository.run_migrations().await?;
        info!("Migrations completed successfully");
    }

    info!("Connecting to log store...");
    let log_store = Arc::new(MongoLogStore::connect(&config.log_store).await?);

    // The document store is not required for url traffic
    match log_store.ping().await {
        Ok(()) => info!("Log store connection verified"),
        Err(e) => tracing::warn!("Log store ping failed: {}. Log endpoints may fail.", e),
    }

    let state = Arc::new(AppState {
        urls: repository.clone(),
        users: repository,
        logs: log_store,
        auth_service: AuthService::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiration_hours,
        ),
        short_codes: ShortCodeGenerator::new(
            config.url.short_code_length,
            config.url.short_code_max_attempts,
        ),
        pagination: config.pagination,
        base_url: config.url.base_url.clone(),
        strict_url_validation: config.url.strict_url_validation,
        request_timeout: Duration::from_secs(config.server.request_timeout_seconds),
        bcrypt_cost: config.auth.bcrypt_cost,
    });

    let app = routes::create_router(state, &config.cors, config.rate_limit)?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to bind to address {}: {}", addr, e)))?;

    info!("Server listening on {}", addr);
    info!("Base URL: {}", config.url.base_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(create_shutdown_signal())
        .await
        .map_err(|e| AppError::Internal(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves when a shutdown signal is received.
///
/// On Unix-like systems, this listens for both Ctrl+C (SIGINT) and SIGTERM.
/// On other platforms, it only listens for Ctrl+C.
///
/// # Panics
///
/// Panics if signal handler installation fails; without it the process
/// cannot be shut down gracefully at all.
async fn create_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    ctrl_c.await;

    info!("Shutdown signal received");
}
