//! Account and session orchestration.
//!
//! Every operation is a short sequence of store round trips. A failed step
//! aborts the sequence; nothing is compensated. In particular the user row and
//! the session row are two independent writes, so a session failure right
//! after sign-up leaves an account that must sign in to get tokens.

use std::sync::Arc;

use chrono::TimeDelta;
use passage_core::clock::Clock;
use passage_core::error::CoreError;
use passage_core::types::{new_id, DbId};
use passage_core::validation::{validate_avatar_url, validate_password, UserDraft};
use passage_db::models::session::CreateSession;
use passage_db::models::user::CreateUser;
use passage_db::store::{SessionStore, UserStore};
use serde::Serialize;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, JwtConfig};
use crate::auth::password::PasswordHasher;
use crate::notifications::Mailer;
use crate::services::verification::{EmailVerificationService, INVALID_CODE_MESSAGE};

/// Returned for both an unknown username and a wrong password.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid credentials";

/// Returned when no live session matches a refresh token and ip.
pub const INVALID_SESSION_MESSAGE: &str = "session invalid or expired";

/// Default session lifetime: 30 days.
const DEFAULT_SESSION_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Password hashed once at start-up and verified against when a username does
/// not exist, so unknown users cost the same as wrong passwords.
const TIMING_DUMMY_PASSWORD: &str = "timing-equaliser-0";

/// Lifetime of refresh-token sessions.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

/// Access + refresh token pair handed to a client. Never persisted as such.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Collaborators of [`AuthService`].
pub struct AuthDeps {
    pub users: Arc<dyn UserStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub verification: Arc<EmailVerificationService>,
    pub mailer: Arc<dyn Mailer>,
    pub clock: Arc<dyn Clock>,
}

pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    verification: Arc<EmailVerificationService>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    hasher: PasswordHasher,
    jwt: JwtConfig,
    session: SessionConfig,
    dummy_hash: Option<String>,
}

impl AuthService {
    pub fn new(
        deps: AuthDeps,
        hasher: PasswordHasher,
        jwt: JwtConfig,
        session: SessionConfig,
    ) -> Self {
        let dummy_hash = match hasher.hash(TIMING_DUMMY_PASSWORD) {
            Ok(hash) => Some(hash),
            Err(e) => {
                tracing::warn!(error = %e, "Could not prepare timing dummy hash");
                None
            }
        };

        Self {
            users: deps.users,
            sessions: deps.sessions,
            verification: deps.verification,
            mailer: deps.mailer,
            clock: deps.clock,
            hasher,
            jwt,
            session,
            dummy_hash,
        }
    }

    /// Register a new account and open its first session.
    ///
    /// Order: verify the email code, validate the draft, hash the password,
    /// insert the user, create a session, send the welcome email. The welcome
    /// email is best effort.
    pub async fn sign_up(
        &self,
        draft: &UserDraft,
        code: u64,
        ip: &str,
    ) -> Result<TokenPair, CoreError> {
        self.verification.verify_code(&draft.email, code).await?;

        draft.validate()?;

        let password_hash = self.hash_password(&draft.password).await?;

        let user = self
            .users
            .create(&CreateUser {
                id: new_id(),
                username: draft.username.clone(),
                email: draft.email.clone(),
                password_hash,
                // The code check above proved ownership of the address.
                verified: true,
            })
            .await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        let tokens = self.create_session(user.id, ip).await.inspect_err(|e| {
            tracing::error!(
                user_id = %user.id,
                error = %e,
                "User created but session could not be opened; client must sign in"
            );
        })?;

        if let Err(e) = self.mailer.send_welcome(&user.email, &user.username).await {
            tracing::warn!(user_id = %user.id, error = %e, "Welcome email not sent");
        }

        Ok(tokens)
    }

    /// Exchange username + password for a new session.
    ///
    /// An unknown username and a wrong password produce the same error.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
        ip: &str,
    ) -> Result<TokenPair, CoreError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            if let Some(dummy) = &self.dummy_hash {
                self.verify_password(dummy.clone(), password).await?;
            }
            return Err(invalid_credentials());
        };

        if !self
            .verify_password(user.password_hash.clone(), password)
            .await?
        {
            return Err(invalid_credentials());
        }

        let tokens = self.create_session(user.id, ip).await?;
        tracing::info!(user_id = %user.id, ip, "User signed in");

        if let Err(e) = self.mailer.send_login_alert(&user.email, ip).await {
            tracing::warn!(user_id = %user.id, error = %e, "Login alert email not sent");
        }

        Ok(tokens)
    }

    /// Delete the session bound to `(refresh_token, ip)`.
    ///
    /// Idempotent: removing nothing is still success.
    pub async fn sign_out(&self, refresh_token: &str, ip: &str) -> Result<(), CoreError> {
        let deleted = self.sessions.delete(refresh_token, ip).await?;
        tracing::debug!(deleted, "Sign-out processed");
        Ok(())
    }

    /// Mint a fresh access token for a live session.
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh_tokens(&self, refresh_token: &str, ip: &str) -> Result<String, CoreError> {
        let now = self.clock.now();
        let user_id = self
            .sessions
            .find_active_user_id(refresh_token, ip, now)
            .await?
            .ok_or_else(|| CoreError::InvalidArgument(INVALID_SESSION_MESSAGE.to_string()))?;

        generate_access_token(user_id, &self.jwt, now)
            .map_err(|e| CoreError::internal("access token signing", e))
    }

    /// Issue a token pair for `user_id` and persist the session row.
    ///
    /// Tokens are only returned once the row is stored.
    pub async fn create_session(&self, user_id: DbId, ip: &str) -> Result<TokenPair, CoreError> {
        let now = self.clock.now();

        let access_token = generate_access_token(user_id, &self.jwt, now)
            .map_err(|e| CoreError::internal("access token signing", e))?;
        let refresh_token =
            generate_refresh_token().map_err(|e| CoreError::internal("refresh token", e))?;

        let expires_at = TimeDelta::try_seconds(self.session.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "session expiry out of range for ttl {}s",
                    self.session.ttl_secs
                ))
            })?;

        self.sessions
            .create(&CreateSession {
                id: new_id(),
                user_id,
                refresh_token: refresh_token.clone(),
                ip: ip.to_string(),
                expires_at,
            })
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Set a new password for the account owning `email`, authorised by a
    /// verification code sent to that address.
    ///
    /// An address with no account fails exactly like a wrong code.
    pub async fn forgot_password(
        &self,
        email: &str,
        code: u64,
        new_password: &str,
    ) -> Result<(), CoreError> {
        self.verification.verify_code(email, code).await?;
        validate_password(new_password)?;

        let password_hash = self.hash_password(new_password).await?;
        if !self
            .users
            .update_password_by_email(email, &password_hash)
            .await?
        {
            tracing::debug!(email, "Password reset for unknown address");
            return Err(CoreError::InvalidArgument(INVALID_CODE_MESSAGE.to_string()));
        }

        tracing::info!(email, "Password reset");
        Ok(())
    }

    /// Replace the avatar of an authenticated user.
    pub async fn update_avatar(&self, user_id: DbId, avatar_url: &str) -> Result<(), CoreError> {
        validate_avatar_url(avatar_url)?;
        if !self.users.update_avatar(user_id, avatar_url).await? {
            return Err(CoreError::NotFound {
                entity: "user",
                id: user_id.to_string(),
            });
        }
        Ok(())
    }

    /// Whether the account store answers.
    pub async fn health_check(&self) -> Result<(), CoreError> {
        self.users.ping().await
    }

    // -----------------------------------------------------------------------
    // Hashing runs on the blocking pool: it is deliberately slow.
    // -----------------------------------------------------------------------

    async fn hash_password(&self, password: &str) -> Result<String, CoreError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| CoreError::internal("password hashing task", e))?
            .map_err(|e| CoreError::internal("password hashing", e))
    }

    async fn verify_password(&self, hash: String, password: &str) -> Result<bool, CoreError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|e| CoreError::internal("password verification task", e))
    }
}

fn invalid_credentials() -> CoreError {
    CoreError::InvalidArgument(INVALID_CREDENTIALS_MESSAGE.to_string())
}
