//! Email notification target.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pager_protocols::{Alert, PagerError, Target};

use crate::transport::{EmailService, LogEmailService};

/// Pages one email address.
pub struct EmailTarget {
    id: String,
    address: String,
    transport: Arc<dyn EmailService>,
}

impl EmailTarget {
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        transport: Arc<dyn EmailService>,
    ) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            transport,
        }
    }

    /// Target whose emails only go to the log.
    pub fn logging(id: impl Into<String>, address: impl Into<String>) -> Self {
        Self::new(id, address, Arc::new(LogEmailService))
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn subject(alert: &Alert) -> String {
        format!("Alert for Service {}", alert.service_id())
    }
}

impl std::fmt::Debug for EmailTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailTarget")
            .field("id", &self.id)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Target for EmailTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "email"
    }

    async fn notify(&self, alert: &Alert) -> Result<(), PagerError> {
        debug!("Emailing {} about service '{}'", self.address, alert.service_id());
        self.transport
            .send_email(&self.address, &Self::subject(alert), alert.message())
            .await
            .map_err(|e| PagerError::notification(&self.id, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::EmailError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<(String, String, String)>>,
        reject: bool,
    }

    #[async_trait]
    impl EmailService for Outbox {
        async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
            if self.reject {
                return Err(EmailError::Rejected(to.to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_notify_sends_email() {
        let outbox = Arc::new(Outbox::default());
        let target = EmailTarget::new("oncall-email", "oncall@example.com", outbox.clone());

        target
            .notify(&Alert::new("Disk full", "storage"))
            .await
            .unwrap();

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "oncall@example.com");
        assert_eq!(sent[0].1, "Alert for Service storage");
        assert_eq!(sent[0].2, "Disk full");
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_notification_error() {
        let outbox = Arc::new(Outbox {
            reject: true,
            ..Default::default()
        });
        let target = EmailTarget::new("oncall-email", "oncall@example.com", outbox);

        let err = target
            .notify(&Alert::new("Disk full", "storage"))
            .await
            .unwrap_err();
        match err {
            PagerError::Notification { target, reason } => {
                assert_eq!(target, "oncall-email");
                assert!(reason.contains("oncall@example.com"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_logging_target() {
        let target = EmailTarget::logging("oncall-email", "oncall@example.com");
        assert_eq!(target.id(), "oncall-email");
        assert_eq!(target.kind(), "email");
        assert_eq!(target.address(), "oncall@example.com");
        assert!(target.notify(&Alert::new("down", "api")).await.is_ok());
    }
}
