//! Repository for the `user_sessions` table.

use async_trait::async_trait;
use passage_core::error::CoreError;
use passage_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::error::{classify_session_error, classify_sqlx_error};
use crate::models::session::CreateSession;
use crate::store::SessionStore;

/// PostgreSQL-backed [`SessionStore`].
///
/// Expiry is compared against a caller-supplied `now` instead of the
/// database's `NOW()` so the service clock stays authoritative.
#[derive(Clone)]
pub struct SessionRepo {
    pool: PgPool,
}

impl SessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepo {
    async fn create(&self, input: &CreateSession) -> Result<(), CoreError> {
        sqlx::query(
            "INSERT INTO user_sessions (id, user_id, refresh_token, ip, expires_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(input.id)
        .bind(input.user_id)
        .bind(&input.refresh_token)
        .bind(&input.ip)
        .bind(input.expires_at)
        .execute(&self.pool)
        .await
        .map_err(classify_session_error)?;
        Ok(())
    }

    async fn find_active_user_id(
        &self,
        refresh_token: &str,
        ip: &str,
        now: Timestamp,
    ) -> Result<Option<DbId>, CoreError> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT user_id FROM user_sessions
             WHERE refresh_token = $1
               AND ip = $2
               AND expires_at > $3",
        )
        .bind(refresh_token)
        .bind(ip)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(classify_sqlx_error)
    }

    async fn delete(&self, refresh_token: &str, ip: &str) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE refresh_token = $1 AND ip = $2")
            .bind(refresh_token)
            .bind(ip)
            .execute(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: Timestamp) -> Result<u64, CoreError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(result.rows_affected())
    }
}
