//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /sign-up          -> sign_up
/// POST /sign-in          -> sign_in
/// POST /sign-out         -> sign_out
/// POST /refresh          -> refresh
/// POST /forgot-password  -> forgot_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/refresh", post(auth::refresh))
        .route("/forgot-password", post(auth::forgot_password))
}
