//! Classification of driver errors into [`CoreError`].
//!
//! This is the only place that looks at SQLSTATE codes or Redis error kinds.

use passage_core::error::CoreError;

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

pub const UQ_USERS_USERNAME: &str = "uq_users_username";
pub const UQ_USERS_EMAIL: &str = "uq_users_email";
pub const UQ_SESSIONS_REFRESH_TOKEN: &str = "uq_user_sessions_refresh_token";

/// Name of the violated unique constraint, if `err` is a unique violation.
fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            Some(db_err.constraint().unwrap_or("unknown"))
        }
        _ => None,
    }
}

/// Classify an error from a write to the `users` table.
///
/// - Username / email unique violations map to `AlreadyExists`.
/// - Everything else maps to `Internal`.
pub fn classify_user_error(err: sqlx::Error) -> CoreError {
    match unique_violation(&err) {
        Some(UQ_USERS_USERNAME) => CoreError::AlreadyExists("username is already taken".into()),
        Some(UQ_USERS_EMAIL) => CoreError::AlreadyExists("email is already registered".into()),
        Some(other) => {
            CoreError::AlreadyExists(format!("duplicate value violates unique constraint: {other}"))
        }
        None => classify_sqlx_error(err),
    }
}

/// Classify an error from a write to the `user_sessions` table.
///
/// A refresh-token collision is not the caller's fault, so it surfaces as a
/// retryable `Internal` rather than `AlreadyExists`.
pub fn classify_session_error(err: sqlx::Error) -> CoreError {
    match unique_violation(&err) {
        Some(constraint) => {
            tracing::warn!(constraint, "Refresh token collision on session insert");
            CoreError::Internal(format!(
                "session insert conflicted on {constraint}; retry the request"
            ))
        }
        None => classify_sqlx_error(err),
    }
}

/// Any other database failure is `Internal`.
pub fn classify_sqlx_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::internal("database", err)
}

/// Redis failures are always `Internal`.
pub fn classify_redis_error(err: redis::RedisError) -> CoreError {
    tracing::error!(error = %err, "Redis error");
    CoreError::internal("redis", err)
}
