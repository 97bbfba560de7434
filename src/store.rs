//! Persistence traits used by the handlers and core services.
//!
//! - [`crate::db::Repository`] implements [`UrlStore`] and [`UserStore`] on PostgreSQL
//! - [`crate::log_store::MongoLogStore`] implements [`LogStore`] on MongoDB
//! - `mockall` mocks are generated for unit tests

use crate::error::AppResult;
use crate::logs::{LogFilter, LogRecord};
use crate::models::{NewUrl, NewUser, UrlEntry, UrlStats, User};
use crate::services::pagination::PageRequest;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Whether any url, active or not, already holds `short_code`.
    async fn short_code_exists(&self, short_code: &str) -> AppResult<bool>;

    /// Insert a new url.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AppError::ShortCodeExists`] when the store's
    /// unique constraint rejects the code.
    async fn insert_url(&self, new_url: NewUrl) -> AppResult<UrlEntry>;

    /// Atomically add one click to an active url and return it.
    ///
    /// Returns `Ok(None)` when no active url holds `short_code`.
    async fn record_click(&self, short_code: &str) -> AppResult<Option<UrlEntry>>;

    /// One page of a user's active urls, newest first, plus the total count.
    async fn list_by_owner(&self, user_id: i64, page: PageRequest) -> AppResult<(Vec<UrlEntry>, u64)>;

    /// Point an owned active url at a new target.
    async fn update_target(
        &self,
        id: i64,
        user_id: i64,
        original_url: &str,
    ) -> AppResult<Option<UrlEntry>>;

    /// Logically delete an owned active url. Returns `false` if nothing matched.
    async fn deactivate(&self, id: i64, user_id: i64) -> AppResult<bool>;

    async fn stats(&self) -> AppResult<UrlStats>;

    async fn ping(&self) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::error::AppError::Conflict`] when the email is taken.
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_id(&self, user_id: i64) -> AppResult<Option<User>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persist a record and return it with its assigned id.
    async fn insert_log(&self, record: LogRecord) -> AppResult<LogRecord>;

    /// # Errors
    ///
    /// Returns [`crate::error::AppError::Validation`] for a malformed id.
    async fn find_log(&self, id: &str) -> AppResult<Option<LogRecord>>;

    /// One page of matching logs, newest first, plus the total match count.
    async fn find_logs(&self, filter: LogFilter, page: PageRequest) -> AppResult<(Vec<LogRecord>, u64)>;

    async fn ping(&self) -> AppResult<()>;
}
