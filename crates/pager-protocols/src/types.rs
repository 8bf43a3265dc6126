//! Shared value types.

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a monitored service.
pub type ServiceId = String;

/// Health state of a monitored service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// No open incident.
    #[default]
    Healthy,
    /// An incident is open.
    Unhealthy,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Healthy => write!(f, "healthy"),
            ServiceState::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// One incident occurrence for a service.
///
/// Escalation progress only moves forward: the level only increases, the
/// notified set only grows and acknowledgment is one-way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    message: String,
    service_id: ServiceId,
    acknowledged: bool,
    escalation_level: usize,
    notified_targets: BTreeSet<String>,
    created_at: DateTime<Utc>,
}

impl Alert {
    /// Create a new, unacknowledged alert at level 0.
    pub fn new(message: impl Into<String>, service_id: impl Into<ServiceId>) -> Self {
        Self {
            message: message.into(),
            service_id: service_id.into(),
            acknowledged: false,
            escalation_level: 0,
            notified_targets: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild an alert with previously recorded progress.
    pub fn restore(
        message: impl Into<String>,
        service_id: impl Into<ServiceId>,
        escalation_level: usize,
        acknowledged: bool,
        notified_targets: impl IntoIterator<Item = String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            message: message.into(),
            service_id: service_id.into(),
            acknowledged,
            escalation_level,
            notified_targets: notified_targets.into_iter().collect(),
            created_at,
        }
    }

    /// Start a new incident from this alert's message and service.
    ///
    /// Escalation progress is reset: level 0, unacknowledged, nobody notified.
    pub fn into_incident(self) -> Self {
        Self {
            acknowledged: false,
            escalation_level: 0,
            notified_targets: BTreeSet::new(),
            ..self
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn escalation_level(&self) -> usize {
        self.escalation_level
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Ids of targets that were successfully notified for this incident.
    pub fn notified_targets(&self) -> &BTreeSet<String> {
        &self.notified_targets
    }

    pub fn has_notified(&self, target_id: &str) -> bool {
        self.notified_targets.contains(target_id)
    }

    /// Mark the alert acknowledged. Returns `false` if it already was.
    pub fn acknowledge(&mut self) -> bool {
        let changed = !self.acknowledged;
        self.acknowledged = true;
        changed
    }

    /// Move to the next escalation level and return it.
    pub fn escalate(&mut self) -> usize {
        self.escalation_level += 1;
        self.escalation_level
    }

    /// Record a successful delivery. Returns `false` if the target was already recorded.
    pub fn mark_notified(&mut self, target_id: impl Into<String>) -> bool {
        self.notified_targets.insert(target_id.into())
    }
}
