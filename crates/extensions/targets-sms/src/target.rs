//! SMS notification target.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pager_protocols::{Alert, PagerError, Target};

use crate::transport::{LogSmsService, SmsService};

/// Pages one phone number.
pub struct SmsTarget {
    id: String,
    phone_number: String,
    transport: Arc<dyn SmsService>,
}

impl SmsTarget {
    pub fn new(
        id: impl Into<String>,
        phone_number: impl Into<String>,
        transport: Arc<dyn SmsService>,
    ) -> Self {
        Self {
            id: id.into(),
            phone_number: phone_number.into(),
            transport,
        }
    }

    pub fn logging(id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self::new(id, phone_number, Arc::new(LogSmsService))
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    /// Text sent for `alert`.
    pub fn text(alert: &Alert) -> String {
        format!("Alert for Service {}: {}", alert.service_id(), alert.message())
    }
}

impl std::fmt::Debug for SmsTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsTarget")
            .field("id", &self.id)
            .field("phone_number", &self.phone_number)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Target for SmsTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "sms"
    }

    async fn notify(&self, alert: &Alert) -> Result<(), PagerError> {
        debug!("Texting {} about service '{}'", self.phone_number, alert.service_id());
        self.transport
            .send_sms(&self.phone_number, &Self::text(alert))
            .await
            .map_err(|e| PagerError::notification(&self.id, e.to_string()))
    }
}
