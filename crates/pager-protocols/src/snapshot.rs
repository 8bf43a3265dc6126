//! Serializable service snapshots.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Alert, ServiceId, ServiceState};

/// Point-in-time state of a monitored service, enough to rebuild it after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSnapshot {
    pub id: ServiceId,
    pub state: ServiceState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertSnapshot>,
}

impl ServiceSnapshot {
    /// Snapshot of a healthy service with no incident.
    pub fn healthy(id: impl Into<ServiceId>) -> Self {
        Self {
            id: id.into(),
            state: ServiceState::Healthy,
            alert: None,
        }
    }
}

/// Escalation progress of the current alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSnapshot {
    pub message: String,
    pub escalation_level: usize,
    pub acknowledged: bool,
    #[serde(default)]
    pub notified_targets: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Alert> for AlertSnapshot {
    fn from(alert: &Alert) -> Self {
        Self {
            message: alert.message().to_string(),
            escalation_level: alert.escalation_level(),
            acknowledged: alert.is_acknowledged(),
            notified_targets: alert.notified_targets().clone(),
            created_at: alert.created_at(),
        }
    }
}

impl AlertSnapshot {
    /// Rebuild the alert for `service_id`.
    pub fn into_alert(self, service_id: impl Into<ServiceId>) -> Alert {
        Alert::restore(
            self.message,
            service_id,
            self.escalation_level,
            self.acknowledged,
            self.notified_targets,
            self.created_at,
        )
    }
}
