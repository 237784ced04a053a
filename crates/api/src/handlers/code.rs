//! Handlers for the `/codes` resource (email verification codes).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /codes/email`.
#[derive(Debug, Deserialize)]
pub struct CreateEmailCodeRequest {
    pub email: String,
}

/// Request body for `POST /codes/email/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailCodeRequest {
    pub email: String,
    pub code: u64,
}

#[derive(Debug, Serialize)]
pub struct VerifyEmailCodeResponse {
    pub verified: bool,
}

/// POST /api/v1/codes/email
///
/// Issue a code and mail it. The code is never part of the response.
pub async fn create_email_code(
    State(state): State<AppState>,
    Json(input): Json<CreateEmailCodeRequest>,
) -> AppResult<StatusCode> {
    state
        .verification
        .create_verification_code(&input.email)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/codes/email/verify
pub async fn verify_email_code(
    State(state): State<AppState>,
    Json(input): Json<VerifyEmailCodeRequest>,
) -> AppResult<Json<DataResponse<VerifyEmailCodeResponse>>> {
    let verified = state
        .verification
        .verify_code(&input.email, input.code)
        .await?;
    Ok(Json(DataResponse {
        data: VerifyEmailCodeResponse { verified },
    }))
}
