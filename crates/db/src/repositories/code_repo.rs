//! Redis adapter for email verification codes.
//!
//! Layout: `emailcode:<email> -> <code>` with `EX` set to the verification
//! window. `SET` replaces any previous code and its TTL, so the last issued
//! code for an address is the only live one.

use std::time::Duration;

use async_trait::async_trait;
use passage_core::error::CoreError;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::classify_redis_error;
use crate::store::VerificationCodeStore;

/// Key prefix for email verification codes.
pub const EMAIL_CODE_PREFIX: &str = "emailcode";

/// Redis key holding the code for `email`.
pub fn email_code_key(email: &str) -> String {
    format!("{EMAIL_CODE_PREFIX}:{email}")
}

/// Redis-backed [`VerificationCodeStore`].
#[derive(Clone)]
pub struct CodeRepo {
    conn: ConnectionManager,
}

impl CodeRepo {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl VerificationCodeStore for CodeRepo {
    async fn put(&self, email: &str, code: u64, ttl: Duration) -> Result<(), CoreError> {
        // Redis rejects a zero expiry; round sub-second windows up.
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(email_code_key(email), code, seconds)
            .await
            .map_err(classify_redis_error)?;
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<u64>, CoreError> {
        let mut conn = self.conn.clone();
        conn.get(email_code_key(email))
            .await
            .map_err(classify_redis_error)
    }
}
