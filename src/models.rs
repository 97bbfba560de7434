use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Short url row in the `urls` table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct UrlEntry {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub user_id: Option<i64>,
    pub click_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Values for a short url that is about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrl {
    pub short_code: String,
    pub original_url: String,
    pub user_id: Option<i64>,
}

/// Request to create a short URL
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUrlRequest {
    #[validate(url(message = "Invalid url format"))]
    pub url: String,
}

/// Request to point an existing short URL somewhere else
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUrlRequest {
    #[validate(url(message = "Invalid url format"))]
    pub url: String,
}

/// Response after creating a short URL
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlResponse {
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// A short URL as shown to its owner
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UrlListItem {
    pub url_id: i64,
    pub original_url: String,
    pub short_url: String,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UrlListItem {
    pub fn from_entry(entry: UrlEntry, base_url: &str) -> Self {
        UrlListItem {
            url_id: entry.id,
            short_url: crate::util::short_url(base_url, &entry.short_code),
            original_url: entry.original_url,
            click_count: entry.click_count,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Aggregate numbers for the admin `stats` command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlStats {
    pub total_urls: i64,
    pub active_urls: i64,
    pub total_clicks: i64,
    pub total_users: i64,
}

/// User row in the `users` table
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Registration payload
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

/// A user without its password hash
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
