//! Email transports.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Recipient '{0}' rejected")]
    Rejected(String),

    #[error("Email transport unavailable: {0}")]
    Unavailable(String),
}

/// Delivers a single email.
#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// Transport that only writes each email to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEmailService;

#[async_trait]
impl EmailService for LogEmailService {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        info!(to = %to, subject = %subject, "Sending email: {}", body);
        Ok(())
    }
}
