use axum::routing::put;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// PUT /me/avatar  -> update_avatar (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me/avatar", put(user::update_avatar))
}
