//! Handlers for the `/auth` resource (sign-up, sign-in, sign-out, refresh,
//! password reset).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use passage_core::validation::UserDraft;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::client_ip::ClientIp;
use crate::response::DataResponse;
use crate::services::TokenPair;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Verification code previously mailed to `email`.
    pub code: u64,
}

/// Request body for `POST /auth/sign-in`.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/sign-out` and `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
    pub code: u64,
    pub password: String,
}

/// Response body for `POST /auth/refresh`.
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/sign-up
///
/// Create an account with a verified email and open its first session.
pub async fn sign_up(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(input): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TokenPair>>)> {
    let draft = UserDraft {
        username: input.username,
        email: input.email,
        password: input.password,
    };
    let tokens = state.auth.sign_up(&draft, input.code, &ip).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: tokens })))
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(input): Json<SignInRequest>,
) -> AppResult<Json<DataResponse<TokenPair>>> {
    let tokens = state
        .auth
        .sign_in(&input.username, &input.password, &ip)
        .await?;
    Ok(Json(DataResponse { data: tokens }))
}

/// POST /api/v1/auth/sign-out
///
/// Always 204 unless the store fails, even if no session matched.
pub async fn sign_out(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(input): Json<RefreshTokenRequest>,
) -> AppResult<StatusCode> {
    state.auth.sign_out(&input.refresh_token, &ip).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/auth/refresh
///
/// Exchange a live refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(input): Json<RefreshTokenRequest>,
) -> AppResult<Json<DataResponse<AccessTokenResponse>>> {
    let access_token = state.auth.refresh_tokens(&input.refresh_token, &ip).await?;
    Ok(Json(DataResponse {
        data: AccessTokenResponse { access_token },
    }))
}

/// POST /api/v1/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .auth
        .forgot_password(&input.email, input.code, &input.password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
