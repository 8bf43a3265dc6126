//! # Pager Core
//!
//! Escalation workflow for monitored services.
//!
//! ## Components
//!
//! - [`EscalationPolicy`] - Ordered target groups, one per escalation level
//! - [`MonitoredService`] - Per-service state machine reacting to alert,
//!   healthy, acknowledge and timeout events
//! - [`PagerService`] - Registry routing events to the right service
//! - [`AlertingService`] - Ingestion facade building alerts from raw reports
//!
//! Every event for one service is processed under that service's lock, so a
//! notification batch always settles before the next event is looked at.

pub mod alerting;
pub mod escalation;
pub mod monitored_service;
pub mod pager_service;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use alerting::AlertingService;
pub use escalation::{EscalationLevel, EscalationPolicy};
pub use monitored_service::{MonitoredService, MonitoredServiceBuilder, ACK_TIMEOUT};
pub use pager_service::PagerService;
