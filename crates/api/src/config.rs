use std::fmt::Debug;
use std::str::FromStr;

use crate::auth::code::CodeConfig;
use crate::auth::jwt::JwtConfig;
use crate::auth::password::PasswordConfig;
use crate::notifications::EmailConfig;
use crate::services::SessionConfig;

/// Default Redis endpoint for verification codes.
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default interval between expired-session purges: 1 hour.
const DEFAULT_SESSION_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Longest accepted lifetime or interval for any configured duration: 10 years.
pub const MAX_DURATION_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Values consumed by the authentication core.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub password: PasswordConfig,
    pub code: CodeConfig,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
}

impl AuthConfig {
    /// Load from environment variables. See [`ServerConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparsable values, an empty code range, or a TTL outside
    /// `1..=MAX_DURATION_SECS`.
    pub fn from_env() -> Self {
        let password_defaults = PasswordConfig::default();
        let password = PasswordConfig {
            iterations: env_or("PASSWORD_HASH_ITERATIONS", password_defaults.iterations),
            memory_kib: env_or("PASSWORD_HASH_MEMORY_KIB", password_defaults.memory_kib),
        };

        let code_defaults = CodeConfig::default();
        let code = CodeConfig {
            min: env_or("VERIFICATION_CODE_MIN", code_defaults.min),
            max: env_or("VERIFICATION_CODE_MAX", code_defaults.max),
            ttl_secs: env_or("VERIFICATION_CODE_TTL_SECS", code_defaults.ttl_secs),
        };
        assert!(
            code.min < code.max,
            "VERIFICATION_CODE_MIN must be below VERIFICATION_CODE_MAX"
        );
        check_duration_secs(
            "VERIFICATION_CODE_TTL_SECS",
            i64::try_from(code.ttl_secs).unwrap_or(i64::MAX),
        );

        let session = SessionConfig {
            ttl_secs: env_or("SESSION_TTL_SECS", SessionConfig::default().ttl_secs),
        };
        check_duration_secs("SESSION_TTL_SECS", session.ttl_secs);

        Self {
            password,
            code,
            jwt: JwtConfig::from_env(),
            session,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// Built once in `main` and handed to every component; nothing reads the
/// environment after start-up.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Take the client address from `X-Forwarded-For` (default: `false`).
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Redis connection string.
    pub redis_url: String,
    /// Seconds between expired-session purges.
    pub session_cleanup_interval_secs: u64,
    /// Authentication core settings.
    pub auth: AuthConfig,
    /// SMTP settings; `None` disables outbound email.
    pub email: Option<EmailConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default                    |
    /// |----------------------------------|----------------------------|
    /// | `HOST`                           | `0.0.0.0`                  |
    /// | `PORT`                           | `3000`                     |
    /// | `CORS_ORIGINS`                   | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`           | `30`                       |
    /// | `TRUST_FORWARDED_FOR`            | `false`                    |
    /// | `DATABASE_URL`                   | **required**               |
    /// | `REDIS_URL`                      | `redis://127.0.0.1:6379`   |
    /// | `SESSION_CLEANUP_INTERVAL_SECS`  | `3600`                     |
    /// | `PASSWORD_HASH_ITERATIONS`       | `3`                        |
    /// | `PASSWORD_HASH_MEMORY_KIB`       | `19456`                    |
    /// | `VERIFICATION_CODE_MIN`          | `100000`                   |
    /// | `VERIFICATION_CODE_MAX`          | `999999`                   |
    /// | `VERIFICATION_CODE_TTL_SECS`     | `900`                      |
    /// | `JWT_SECRET`                     | **required**               |
    /// | `JWT_ACCESS_TTL_SECS`            | `900`                      |
    /// | `SESSION_TTL_SECS`               | `2592000`                  |
    /// | `SMTP_*`                         | see [`EmailConfig`]        |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing, any value fails to parse, or
    /// a duration is outside `1..=MAX_DURATION_SECS`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let redis_url = std::env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.into());

        let session_cleanup_interval_secs = env_or(
            "SESSION_CLEANUP_INTERVAL_SECS",
            DEFAULT_SESSION_CLEANUP_INTERVAL_SECS,
        );
        check_duration_secs(
            "SESSION_CLEANUP_INTERVAL_SECS",
            i64::try_from(session_cleanup_interval_secs).unwrap_or(i64::MAX),
        );

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            trust_forwarded_for: env_or("TRUST_FORWARDED_FOR", false),
            database_url,
            redis_url,
            session_cleanup_interval_secs,
            auth: AuthConfig::from_env(),
            email: EmailConfig::from_env(),
        }
    }
}

/// Read `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    parse_or(key, std::env::var(key).ok(), default)
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{value}': {e:?}")),
        None => default,
    }
}

/// Reject a configured duration that is zero, negative or large enough to
/// overflow timestamp arithmetic.
///
/// # Panics
///
/// Panics when `secs` is outside `1..=MAX_DURATION_SECS`.
pub(crate) fn check_duration_secs(key: &str, secs: i64) {
    assert!(
        (1..=MAX_DURATION_SECS).contains(&secs),
        "{key} must be between 1 and {MAX_DURATION_SECS} seconds (got {secs})"
    );
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
