//! Capability traits for the three external stores.
//!
//! Services hold these as `Arc<dyn ...>` so production adapters and test
//! doubles are interchangeable. Every method returns an already-classified
//! [`CoreError`]; callers never inspect driver errors.
//!
//! Dropping a returned future abandons the in-flight query, so a cancelled
//! request does not leave a hanging round trip behind.

use std::time::Duration;

use async_trait::async_trait;
use passage_core::error::CoreError;
use passage_core::types::{DbId, Timestamp};

use crate::models::session::CreateSession;
use crate::models::user::{CreateUser, User};

/// Durable account storage. Username and email uniqueness is enforced here.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A username or email collision is `AlreadyExists`.
    async fn create(&self, input: &CreateUser) -> Result<User, CoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, CoreError>;

    /// Replace the password hash of the account owning `email`.
    /// Returns `false` when no such account exists.
    async fn update_password_by_email(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<bool, CoreError>;

    /// Returns `false` when no user has the given id.
    async fn update_avatar(&self, id: DbId, avatar_url: &str) -> Result<bool, CoreError>;

    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> Result<(), CoreError>;
}

/// Durable refresh-token sessions keyed by `(refresh_token, ip)`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a session. A refresh-token collision is a retryable `Internal`.
    async fn create(&self, input: &CreateSession) -> Result<(), CoreError>;

    /// Owner of the session matching token and ip with `expires_at > now`.
    async fn find_active_user_id(
        &self,
        refresh_token: &str,
        ip: &str,
        now: Timestamp,
    ) -> Result<Option<DbId>, CoreError>;

    /// Delete the session matching token and ip. Returns rows removed (0 or 1).
    async fn delete(&self, refresh_token: &str, ip: &str) -> Result<u64, CoreError>;

    /// Delete every session with `expires_at <= now`. Returns rows removed.
    async fn delete_expired(&self, now: Timestamp) -> Result<u64, CoreError>;
}

/// Short-lived `email -> code` entries with a per-key TTL.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Store `code` for `email`, replacing any live code and resetting the TTL.
    async fn put(&self, email: &str, code: u64, ttl: Duration) -> Result<(), CoreError>;

    /// The live code for `email`, or `None` if it expired or was never issued.
    async fn get(&self, email: &str) -> Result<Option<u64>, CoreError>;
}
