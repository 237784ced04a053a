//! Route definitions for the `/codes` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::code;
use crate::state::AppState;

/// Routes mounted at `/codes`.
///
/// ```text
/// POST /email         -> create_email_code
/// POST /email/verify  -> verify_email_code
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/email", post(code::create_email_code))
        .route("/email/verify", post(code::verify_email_code))
}
