use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Log store error: {0}")]
    LogStore(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Validation failed on `{field}`: {message}")]
    InvalidField { field: String, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Short code already exists: {0}")]
    ShortCodeExists(String),

    #[error("Could not allocate a free short code after {attempts} attempts")]
    ShortCodeGenerationFailed { attempts: u32 },

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Status code and stable machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) | AppError::InvalidField { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Conflict(_) | AppError::ShortCodeExists(_) => {
                (StatusCode::CONFLICT, "CONFLICT")
            }
            AppError::ShortCodeGenerationFailed { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "CODE_SPACE_EXHAUSTED")
            }
            AppError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::LogStore(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LOG_STORE_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let body = match &self {
            AppError::InvalidField { field, message } => json!({
                "error": error_code,
                "message": "Validation failed",
                "details": { "field": field, "message": message },
            }),
            AppError::ShortCodeGenerationFailed { attempts } => {
                tracing::error!(attempts, "Short code space exhausted");
                json!({
                    "error": error_code,
                    "message": "Could not allocate a short code, please retry",
                })
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                json!({ "error": error_code, "message": "Database error occurred" })
            }
            AppError::LogStore(e) => {
                tracing::error!("Log store error: {:?}", e);
                json!({ "error": error_code, "message": "Log store error occurred" })
            }
            _ if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE => {
                tracing::error!("Internal error: {}", self);
                json!({ "error": error_code, "message": "An internal error occurred" })
            }
            _ => json!({ "error": error_code, "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;

/// Whether a sqlx error is a unique violation on the named constraint.
pub fn is_unique_violation(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.constraint() == Some(constraint)
}
