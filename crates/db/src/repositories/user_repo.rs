//! Repository for the `users` table.

use async_trait::async_trait;
use passage_core::error::CoreError;
use passage_core::types::DbId;
use sqlx::PgPool;

use crate::error::{classify_sqlx_error, classify_user_error};
use crate::models::user::{CreateUser, User};
use crate::store::UserStore;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, verified, avatar_url, created_at";

/// PostgreSQL-backed [`UserStore`].
#[derive(Clone)]
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Uniqueness is left to the `uq_users_*` constraints; there is no
    /// check-then-insert.
    async fn create(&self, input: &CreateUser) -> Result<User, CoreError> {
        let query = format!(
            "INSERT INTO users (id, username, email, password_hash, verified)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.verified)
            .fetch_one(&self.pool)
            .await
            .map_err(classify_user_error)
    }

    /// Find a user by username (case-sensitive).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, CoreError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE email = $1",
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_avatar(&self, id: DbId, avatar_url: &str) -> Result<bool, CoreError> {
        let result =
            sqlx::query("UPDATE users SET avatar_url = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(avatar_url)
                .execute(&self.pool)
                .await
                .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }
}
