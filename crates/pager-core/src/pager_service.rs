//! Service registry and event routing.

#[cfg(test)]
#[path = "pager_service_tests.rs"]
mod tests;

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, error, info, warn};

use pager_protocols::{Alert, PagerError, PersistenceAdapter, ServiceId, ServiceSnapshot};

use crate::monitored_service::MonitoredService;

/// Routes events to monitored services by id.
///
/// An alert for an unknown service is reported as an error. Acknowledgments
/// and healthy reports for unknown services are silently dropped, since
/// those channels are routinely fed by sources that do not know which
/// services are registered here.
#[derive(Default)]
pub struct PagerService {
    services: DashMap<ServiceId, Arc<MonitoredService>>,
    persistence: Option<Arc<dyn PersistenceAdapter>>,
}

impl PagerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save service snapshots through `adapter`.
    ///
    /// Applies to services registered after this call.
    pub fn with_persistence(mut self, adapter: Arc<dyn PersistenceAdapter>) -> Self {
        self.persistence = Some(adapter);
        self
    }

    /// Register a service, replacing any previous one with the same id.
    pub fn add_monitored_service(
        &self,
        service: Arc<MonitoredService>,
    ) -> Option<Arc<MonitoredService>> {
        if let Some(ref adapter) = self.persistence {
            service.attach_persistence(adapter.clone());
        }

        let id = service.id().to_string();
        let previous = self.services.insert(id.clone(), service);
        if previous.is_some() {
            info!("Replaced monitored service '{}'", id);
        } else {
            debug!("Registered monitored service '{}'", id);
        }
        previous
    }

    pub fn service(&self, service_id: &str) -> Option<Arc<MonitoredService>> {
        self.services.get(service_id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.services.contains_key(service_id)
    }

    /// Registered ids, sorted.
    pub fn service_ids(&self) -> Vec<ServiceId> {
        let mut ids: Vec<ServiceId> = self.services.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Forward an alert to the service it names.
    pub async fn process_alert(&self, alert: Alert) -> Result<(), PagerError> {
        let Some(service) = self.service(alert.service_id()) else {
            error!("Received alert for unknown service '{}'", alert.service_id());
            return Err(PagerError::UnknownService(alert.service_id().to_string()));
        };
        service.receive_alert(alert).await;
        Ok(())
    }

    /// Forward an acknowledgment. Unknown ids are ignored.
    pub async fn process_acknowledgment(&self, service_id: &str) {
        if let Some(service) = self.service(service_id) {
            service.acknowledge().await;
        }
    }

    /// Forward a healthy report. Unknown ids are ignored.
    pub async fn process_healthy_event(&self, service_id: &str) {
        if let Some(service) = self.service(service_id) {
            service.receive_healthy().await;
        }
    }

    pub async fn snapshot(&self, service_id: &str) -> Option<ServiceSnapshot> {
        let service = self.service(service_id)?;
        Some(service.snapshot().await)
    }

    /// Snapshots of every registered service, sorted by id.
    pub async fn snapshots(&self) -> Vec<ServiceSnapshot> {
        let mut snapshots = Vec::with_capacity(self.len());
        for id in self.service_ids() {
            if let Some(snapshot) = self.snapshot(&id).await {
                snapshots.push(snapshot);
            }
        }
        snapshots
    }

    /// Load saved state for every registered service.
    ///
    /// Returns how many services had a snapshot. Load failures are logged
    /// and leave the service in its current state.
    pub async fn restore(&self) -> usize {
        let Some(ref adapter) = self.persistence else {
            return 0;
        };

        let mut restored = 0;
        for id in self.service_ids() {
            let Some(service) = self.service(&id) else {
                continue;
            };
            match adapter.load_service(&id).await {
                Ok(Some(snapshot)) => {
                    service.restore(snapshot).await;
                    restored += 1;
                }
                Ok(None) => {}
                Err(e) => warn!("Failed to load saved state of service '{}': {}", id, e),
            }
        }

        if restored > 0 {
            info!("Restored state of {} service(s)", restored);
        }
        restored
    }
}
