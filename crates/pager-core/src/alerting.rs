//! Alert ingestion.

use std::sync::Arc;

use pager_protocols::{Alert, PagerError};

use crate::pager_service::PagerService;

/// Entry point for upstream monitoring to report incidents by service id.
#[derive(Clone)]
pub struct AlertingService {
    pager: Arc<PagerService>,
}

impl AlertingService {
    pub fn new(pager: Arc<PagerService>) -> Self {
        Self { pager }
    }

    pub fn pager(&self) -> &Arc<PagerService> {
        &self.pager
    }

    /// Build an alert for `service_id` and route it.
    pub async fn receive_alert(&self, service_id: &str, message: &str) -> Result<(), PagerError> {
        let alert = Alert::new(message, service_id);
        self.pager.process_alert(alert).await
    }
}
