use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{AuthService, EmailVerificationService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (read by middleware for JWT validation and proxy trust).
    pub config: Arc<ServerConfig>,
    /// Sign-up, sign-in, sessions.
    pub auth: Arc<AuthService>,
    /// Email verification codes.
    pub verification: Arc<EmailVerificationService>,
}
