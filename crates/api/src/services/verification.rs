//! Email verification codes.
//!
//! Per address the lifecycle is `NoCode -> CodeIssued -> (Verified | Expired)`.
//! Issuing a new code overwrites the previous one. A successful check does not
//! consume the code: it stays valid until its TTL runs out.

use std::sync::Arc;
use std::time::Duration;

use passage_core::error::CoreError;
use passage_core::validation::validate_email;
use passage_db::store::VerificationCodeStore;

use crate::auth::code::{generate_code, CodeConfig};
use crate::notifications::Mailer;

/// Message for every failed check, whether no code exists or it differs.
pub const INVALID_CODE_MESSAGE: &str = "invalid or expired verification code";

pub struct EmailVerificationService {
    store: Arc<dyn VerificationCodeStore>,
    mailer: Arc<dyn Mailer>,
    config: CodeConfig,
}

impl EmailVerificationService {
    pub fn new(
        store: Arc<dyn VerificationCodeStore>,
        mailer: Arc<dyn Mailer>,
        config: CodeConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            config,
        }
    }

    /// Issue a code for `email`, store it for the configured window and mail it.
    ///
    /// Returns the code. If the mail cannot be dispatched the code is still
    /// stored, but the call fails with `Internal` since the owner never saw it.
    pub async fn create_verification_code(&self, email: &str) -> Result<u64, CoreError> {
        validate_email(email)?;

        let code = generate_code(self.config.min, self.config.max)
            .map_err(|e| CoreError::internal("code generation", e))?;

        self.store
            .put(email, code, Duration::from_secs(self.config.ttl_secs))
            .await?;

        self.mailer
            .send_verification_code(email, code)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, to = email, "Failed to dispatch verification code");
                CoreError::internal("verification email", e)
            })?;

        tracing::debug!(to = email, "Verification code issued");
        Ok(code)
    }

    /// Check `candidate` against the live code for `email`.
    ///
    /// Returns `Ok(true)` on a match. A missing code and a wrong code both
    /// fail with the same `InvalidArgument`; only the debug log tells them
    /// apart. Store failures surface as `Internal`.
    pub async fn verify_code(&self, email: &str, candidate: u64) -> Result<bool, CoreError> {
        match self.store.get(email).await? {
            Some(code) if code == candidate => Ok(true),
            Some(_) => {
                tracing::debug!(email, reason = "mismatch", "Verification code rejected");
                Err(CoreError::InvalidArgument(INVALID_CODE_MESSAGE.to_string()))
            }
            None => {
                tracing::debug!(email, reason = "absent", "Verification code rejected");
                Err(CoreError::InvalidArgument(INVALID_CODE_MESSAGE.to_string()))
            }
        }
    }
}
