pub mod auth;
pub mod code;
pub mod health;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-up                 create account (public)
/// /auth/sign-in                 open session (public)
/// /auth/sign-out                close session (public, refresh token)
/// /auth/refresh                 new access token (public, refresh token)
/// /auth/forgot-password         reset password with email code (public)
///
/// /codes/email                  issue verification code (public)
/// /codes/email/verify           check verification code (public)
///
/// /users/me/avatar              update avatar (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/codes", code::router())
        .nest("/users", user::router())
}
