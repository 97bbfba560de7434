use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

mod auth;
mod cors;
mod database;
mod log_store;
mod pagination;
mod rate_limit;
mod server;
mod url;

pub use auth::AuthConfig;
pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use log_store::LogStoreConfig;
pub use pagination::PaginationConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use url::UrlConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log_store: LogStoreConfig,
    pub url: UrlConfig,
    pub pagination: PaginationConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// Read `key` from the environment, falling back to `default` when unset.
fn env_or<T: FromStr>(key: &str, default: &str) -> AppResult<T> {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
}

fn env_required(key: &str) -> AppResult<String> {
    env::var(key).map_err(|_| AppError::MissingEnvVar(key.to_string()))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let host: String = env_or("SERVER_HOST", "127.0.0.1")?;
        let port: u16 = env_or("SERVER_PORT", "3000")?;
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));

        let config = Config {
            server: ServerConfig {
                host,
                port,
                request_timeout_seconds: env_or("REQUEST_TIMEOUT_SECONDS", "20")?,
            },
            database: DatabaseConfig {
                url: env_required("DATABASE_URL")?,
                max_connections: env_or("DB_MAX_CONNECTIONS", "10")?,
                min_connections: env_or("DB_MIN_CONNECTIONS", "1")?,
                acquire_timeout_seconds: env_or("DB_ACQUIRE_TIMEOUT_SECONDS", "30")?,
            },
            log_store: LogStoreConfig {
                uri: env_or("MONGODB_URI", "mongodb://127.0.0.1:27017")?,
                database: env_or("MONGODB_DATABASE", "linkforge")?,
                collection: env_or("MONGODB_LOG_COLLECTION", "logs")?,
            },
            url: UrlConfig {
                short_code_length: env_or("SHORT_CODE_LENGTH", "6")?,
                base_url: base_url.trim_end_matches('/').to_string(),
                short_code_max_attempts: env_or("SHORT_CODE_MAX_ATTEMPTS", "10")?,
                strict_url_validation: env_or("STRICT_URL_VALIDATION", "true")?,
            },
            pagination: PaginationConfig {
                default_limit: env_or("PAGINATION_DEFAULT_LIMIT", "10")?,
                max_limit: env_or("PAGINATION_MAX_LIMIT", "100")?,
            },
            auth: AuthConfig {
                jwt_secret: env_required("JWT_SECRET")?,
                jwt_expiration_hours: env_or("JWT_EXPIRATION_HOURS", "24")?,
                bcrypt_cost: env_or("BCRYPT_COST", "10")?,
            },
            rate_limit: RateLimitConfig {
                requests_per_minute: env_or("RATE_LIMIT_PER_MINUTE", "60")?,
                burst_size: env_or("RATE_LIMIT_BURST", "10")?,
            },
            cors: CorsConfig::from_list(&env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string())),
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.server
            .validate()
            .and_then(|_| self.database.validate())
            .and_then(|_| self.log_store.validate())
            .and_then(|_| self.url.validate())
            .and_then(|_| self.pagination.validate())
            .and_then(|_| self.auth.validate())
            .and_then(|_| self.rate_limit.validate())
            .map_err(AppError::Configuration)
    }
}
