use crate::error::AppError;
use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderMap};
use validator::ValidationErrors;

/// The bearer token of the `Authorization` header, if there is one.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(|token| Some(token.trim()))
        .ok_or_else(|| {
            AppError::Unauthorized("Authorization header must start with 'Bearer '".to_string())
        })
}

/// Report the first failing field, by field name, as a field-level error.
pub(crate) fn first_field_error(errors: ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();
    let first = field_errors
        .iter()
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .and_then(|(field, errs)| errs.first().map(|e| (field.to_string(), e)));

    match first {
        Some((field, error)) => AppError::InvalidField {
            message: error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {}", field)),
            field,
        },
        None => AppError::Validation(errors.to_string()),
    }
}

pub(crate) fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

/// Parse a numeric path id, reporting garbage as a validation error.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::Validation(format!("Invalid {} id", what)))
}
