//! SMS transports.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("Invalid phone number '{0}'")]
    InvalidNumber(String),

    #[error("SMS gateway error: {0}")]
    Gateway(String),
}

/// Delivers a single text message.
#[async_trait]
pub trait SmsService: Send + Sync {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), SmsError>;
}

/// Gateway stand-in that writes each message to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSmsService;

#[async_trait]
impl SmsService for LogSmsService {
    async fn send_sms(&self, to: &str, message: &str) -> Result<(), SmsError> {
        info!(to = %to, "Sending SMS: {}", message);
        Ok(())
    }
}
