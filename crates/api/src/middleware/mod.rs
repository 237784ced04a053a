//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a Bearer access token.
//! - [`client_ip::ClientIp`] -- the address sessions are bound to.

pub mod auth;
pub mod client_ip;
