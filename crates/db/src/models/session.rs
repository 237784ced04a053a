//! User session DTOs.
//!
//! Sessions are only ever inserted, probed by `(refresh_token, ip)` and
//! deleted, so no full-row model is read back.

use passage_core::types::{DbId, Timestamp};

/// DTO for creating a new row in `user_sessions`.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: DbId,
    pub user_id: DbId,
    /// Opaque capability handed to the client. Unique across all rows.
    pub refresh_token: String,
    /// Client address the token is bound to.
    pub ip: String,
    pub expires_at: Timestamp,
}
