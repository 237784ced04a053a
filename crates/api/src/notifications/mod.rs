//! Outbound email collaborator.
//!
//! Services depend on the [`Mailer`] trait only. [`email::SmtpMailer`] talks
//! to a real SMTP relay; [`LogMailer`] stands in when SMTP is not configured.

pub mod email;

use async_trait::async_trait;

pub use email::{EmailConfig, EmailError, SmtpMailer};

/// Messages the authentication core asks to have delivered.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a freshly issued verification code.
    async fn send_verification_code(&self, to: &str, code: u64) -> Result<(), EmailError>;

    /// Greet a newly registered account.
    async fn send_welcome(&self, to: &str, username: &str) -> Result<(), EmailError>;

    /// Tell an account owner about a successful sign-in.
    async fn send_login_alert(&self, to: &str, ip: &str) -> Result<(), EmailError>;
}

/// Mailer used when no SMTP relay is configured.
///
/// Records that a message would have been sent. Never logs code values.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification_code(&self, to: &str, _code: u64) -> Result<(), EmailError> {
        tracing::info!(to, kind = "verification_code", "Email delivery disabled, not sent");
        Ok(())
    }

    async fn send_welcome(&self, to: &str, username: &str) -> Result<(), EmailError> {
        tracing::info!(to, username, kind = "welcome", "Email delivery disabled, not sent");
        Ok(())
    }

    async fn send_login_alert(&self, to: &str, ip: &str) -> Result<(), EmailError> {
        tracing::info!(to, ip, kind = "login_alert", "Email delivery disabled, not sent");
        Ok(())
    }
}
