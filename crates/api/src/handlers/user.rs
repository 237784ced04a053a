//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PUT /users/me/avatar`.
#[derive(Debug, Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar_url: String,
}

/// PUT /api/v1/users/me/avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UpdateAvatarRequest>,
) -> AppResult<StatusCode> {
    state
        .auth
        .update_avatar(auth_user.user_id, &input.avatar_url)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
