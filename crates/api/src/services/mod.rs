//! Orchestration over the stores and credential primitives.
//!
//! - [`verification`] -- issue and check email verification codes.
//! - [`auth`] -- sign-up, sign-in, sign-out, access-token refresh.

pub mod auth;
pub mod verification;

pub use auth::{AuthDeps, AuthService, SessionConfig, TokenPair};
pub use verification::EmailVerificationService;
