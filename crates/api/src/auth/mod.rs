//! Credential primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`code`] -- random numeric verification codes.
//! - [`jwt`] -- access-token signing/validation and opaque refresh tokens.

pub mod code;
pub mod jwt;
pub mod password;

/// The operating system's randomness source could not be read.
#[derive(Debug, thiserror::Error)]
#[error("entropy source failed: {0}")]
pub struct EntropyError(pub String);
