use super::Repository;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::{NewUser, User};
use crate::store::UserStore;
use async_trait::async_trait;
use chrono::Utc;

const EMAIL_CONSTRAINT: &str = "users_email_key";

#[async_trait]
impl UserStore for Repository {
    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        if self.find_user_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        // A concurrent registration can still slip past the lookup above.
        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e, EMAIL_CONSTRAINT) => {
                Err(AppError::Conflict("User already exists".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn find_user_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }
}
