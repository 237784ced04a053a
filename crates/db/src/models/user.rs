//! User entity model and DTOs.

use std::fmt;

use passage_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER log it or return it to a client.
/// The `Debug` output redacts it.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("verified", &self.verified)
            .field("avatar_url", &self.avatar_url)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// DTO for creating a new user. The id is assigned by the caller.
#[derive(Clone)]
pub struct CreateUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("verified", &self.verified)
            .finish()
    }
}
