use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::{NewUrl, UrlEntry, UrlStats};
use crate::services::pagination::PageRequest;
use crate::store::UrlStore;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;
use std::time::Duration;

mod users;

const SHORT_CODE_CONSTRAINT: &str = "urls_short_code_key";

/// PostgreSQL repository for users and short urls
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    /// Create a new repository with a connection pool
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
    ) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?
            .disable_statement_logging();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn count_by_owner(&self, user_id: i64) -> AppResult<u64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM urls WHERE user_id = $1 AND is_active
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn page_by_owner(&self, user_id: i64, page: PageRequest) -> AppResult<Vec<UrlEntry>> {
        let results = sqlx::query_as::<_, UrlEntry>(
            r#"
            SELECT * FROM urls
            WHERE user_id = $1 AND is_active
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit_i64())
        .bind(page.offset_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }
}

#[async_trait]
impl UrlStore for Repository {
    async fn short_code_exists(&self, short_code: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)
            "#,
        )
        .bind(short_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_url(&self, new_url: NewUrl) -> AppResult<UrlEntry> {
        let result = sqlx::query_as::<_, UrlEntry>(
            r#"
            INSERT INTO urls (short_code, original_url, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new_url.short_code)
        .bind(&new_url.original_url)
        .bind(new_url.user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(entry) => Ok(entry),
            Err(e) if is_unique_violation(&e, SHORT_CODE_CONSTRAINT) => {
                Err(AppError::ShortCodeExists(new_url.short_code))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn record_click(&self, short_code: &str) -> AppResult<Option<UrlEntry>> {
        let result = sqlx::query_as::<_, UrlEntry>(
            r#"
            UPDATE urls
            SET click_count = click_count + 1
            WHERE short_code = $1 AND is_active
            RETURNING *
            "#,
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn list_by_owner(&self, user_id: i64, page: PageRequest) -> AppResult<(Vec<UrlEntry>, u64)> {
        tokio::try_join!(self.page_by_owner(user_id, page), self.count_by_owner(user_id))
    }

    async fn update_target(
        &self,
        id: i64,
        user_id: i64,
        original_url: &str,
    ) -> AppResult<Option<UrlEntry>> {
        let result = sqlx::query_as::<_, UrlEntry>(
            r#"
            UPDATE urls
            SET original_url = $1, updated_at = $2
            WHERE id = $3 AND user_id = $4 AND is_active
            RETURNING *
            "#,
        )
        .bind(original_url)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn deactivate(&self, id: i64, user_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE urls
            SET is_active = FALSE, updated_at = $1
            WHERE id = $2 AND user_id = $3 AND is_active
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn stats(&self) -> AppResult<UrlStats> {
        let row = sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*) as total_urls,
                COUNT(*) FILTER (WHERE is_active) as active_urls,
                COALESCE(CAST(SUM(click_count) AS BIGINT), 0) as total_clicks,
                (SELECT COUNT(*) FROM users) as total_users
            FROM urls
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(UrlStats {
            total_urls: row.0,
            active_urls: row.1,
            total_clicks: row.2,
            total_users: row.3,
        })
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
