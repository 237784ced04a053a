//! Input rules for account fields.
//!
//! Checked before any hashing or store round trip so a malformed sign-up never
//! reaches the database. Every failure is an [`CoreError::InvalidArgument`]
//! naming the offending field.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::ValidateEmail;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Usernames: 3-40 ASCII letters, digits, `_`, `.` or `-`.
pub const USERNAME_PATTERN: &str = r"^[A-Za-z0-9_.\-]{3,40}$";

/// Passwords: 8-64 non-whitespace characters.
pub const PASSWORD_PATTERN: &str = r"^\S{8,64}$";

/// Maximum length of an avatar URL.
pub const MAX_AVATAR_URL_LENGTH: usize = 2048;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USERNAME_PATTERN).expect("valid regex"));

static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PASSWORD_PATTERN).expect("valid regex"));

static LETTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]").expect("valid regex"));

static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").expect("valid regex"));

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::InvalidArgument(
            "username must be 3-40 characters of letters, digits, '_', '.' or '-'".to_string(),
        ));
    }
    Ok(())
}

/// A password must match [`PASSWORD_PATTERN`] and contain at least one letter
/// and one digit.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if !PASSWORD_RE.is_match(password)
        || !LETTER_RE.is_match(password)
        || !DIGIT_RE.is_match(password)
    {
        return Err(CoreError::InvalidArgument(
            "password must be 8-64 characters without spaces and contain a letter and a digit"
                .to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.validate_email() {
        return Err(CoreError::InvalidArgument(
            "email is not a valid address".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_avatar_url(url: &str) -> Result<(), CoreError> {
    if url.len() > MAX_AVATAR_URL_LENGTH {
        return Err(CoreError::InvalidArgument(format!(
            "avatar_url exceeds maximum length of {MAX_AVATAR_URL_LENGTH} characters (got {})",
            url.len()
        )));
    }
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host_and_path) if !host_and_path.is_empty() && !url.contains(char::is_whitespace) => {
            Ok(())
        }
        _ => Err(CoreError::InvalidArgument(
            "avatar_url must be an http or https URL".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Sign-up draft
// ---------------------------------------------------------------------------

/// Account fields submitted at sign-up, before hashing.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl UserDraft {
    /// Check username, then password, then email. Stops at the first failure.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        validate_email(&self.email)?;
        Ok(())
    }
}
