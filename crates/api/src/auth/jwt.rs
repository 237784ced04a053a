//! JWT access-token generation/validation and refresh-token helpers.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload whose
//! subject is the user id. Refresh tokens are opaque: 32 random bytes,
//! hex-encoded. Their uniqueness is enforced by the session store's unique
//! index, not checked here.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use passage_core::types::{DbId, Timestamp};
use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntropyError;
use crate::config::check_duration_secs;

/// Number of random bytes in a refresh token (64 hex characters).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Default access token lifetime: 15 minutes.
const DEFAULT_ACCESS_TTL_SECS: i64 = 900;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in seconds (default: 900).
    pub access_token_ttl_secs: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `JWT_SECRET`          | **yes**  | --      |
    /// | `JWT_ACCESS_TTL_SECS` | no       | `900`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty, or if the TTL is outside
    /// `1..=MAX_DURATION_SECS`.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_ttl_secs: i64 = std::env::var("JWT_ACCESS_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_TTL_SECS.to_string())
            .parse()
            .expect("JWT_ACCESS_TTL_SECS must be a valid i64");
        check_duration_secs("JWT_ACCESS_TTL_SECS", access_token_ttl_secs);

        Self {
            secret,
            access_token_ttl_secs,
        }
    }
}

/// Generate an HS256 access token for `user_id`, issued at `now`.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
    now: Timestamp,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = now.timestamp();
    let claims = Claims {
        sub: user_id,
        exp: iat.saturating_add(config.access_token_ttl_secs),
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration against wall-clock time.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Generate a cryptographically random, hex-encoded refresh token.
pub fn generate_refresh_token() -> Result<String, EntropyError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| EntropyError(e.to_string()))?;
    Ok(hex::encode(bytes))
}
