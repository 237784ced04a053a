//! Client address extractor.
//!
//! Sessions are bound to the address a token was issued to, so every
//! session-touching handler needs it. With `trust_forwarded_for` enabled the
//! first `X-Forwarded-For` entry wins; otherwise the TCP peer address is used.

use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::error::AppError;
use crate::state::AppState;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Normalised textual client IP (e.g. `"203.0.113.7"`, `"::1"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.trust_forwarded_for {
            if let Some(ip) = forwarded_for(&parts.headers)? {
                return Ok(ClientIp(ip.to_string()));
            }
        }

        // The extractor also honours `MockConnectInfo` installed by tests.
        let ConnectInfo(addr) = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Unable to determine client address".into()))?;
        Ok(ClientIp(addr.ip().to_string()))
    }
}

/// First address in `X-Forwarded-For`, if the header is present.
fn forwarded_for(headers: &HeaderMap) -> Result<Option<IpAddr>, AppError> {
    let Some(value) = headers.get(FORWARDED_FOR_HEADER) else {
        return Ok(None);
    };
    let first = value
        .to_str()
        .ok()
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .unwrap_or_default();
    first
        .parse::<IpAddr>()
        .map(Some)
        .map_err(|_| AppError::BadRequest("Malformed X-Forwarded-For header".into()))
}
