//! Monitored service state machine.
//!
//! A service is either `Healthy` or `Unhealthy`. While unhealthy it owns
//! exactly one [`Alert`] and at most one acknowledgment timer. Four events
//! drive it: an incoming alert, a healthy report, an acknowledgment and the
//! expiry of the acknowledgment timer.
//!
//! All four run under the service's async mutex, including the notification
//! fan-out, so no event is looked at until the previous one has settled.
//! Timer callbacks carry the generation number they were issued with and
//! are ignored once that generation is no longer the active one.

#[cfg(test)]
#[path = "monitored_service_tests.rs"]
mod tests;

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, OnceLock, Weak};
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use pager_protocols::{
    Alert, AlertSnapshot, PersistenceAdapter, ServiceId, ServiceSnapshot, ServiceState, Target,
    TimerCallback, TimerHandle, TimerService,
};

use crate::escalation::EscalationPolicy;

/// Time a level has to acknowledge before the next level is paged.
pub const ACK_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy)]
struct ActiveTimer {
    handle: TimerHandle,
    generation: u64,
}

#[derive(Debug, Default)]
struct ServiceInner {
    state: ServiceState,
    current_alert: Option<Alert>,
    timer: Option<ActiveTimer>,
    timer_generation: u64,
}

/// A service under monitoring, with its escalation policy and open incident.
pub struct MonitoredService {
    id: ServiceId,
    policy: EscalationPolicy,
    timer_service: Arc<dyn TimerService>,
    ack_timeout: Duration,
    persistence: OnceLock<Arc<dyn PersistenceAdapter>>,
    inner: Mutex<ServiceInner>,
    this: Weak<MonitoredService>,
}

/// Builder for [`MonitoredService`].
pub struct MonitoredServiceBuilder {
    id: ServiceId,
    policy: EscalationPolicy,
    timer_service: Arc<dyn TimerService>,
    ack_timeout: Duration,
    persistence: Option<Arc<dyn PersistenceAdapter>>,
}

impl MonitoredServiceBuilder {
    /// Override the acknowledgment window (defaults to [`ACK_TIMEOUT`]).
    pub fn ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    /// Save a snapshot through `adapter` after every transition.
    pub fn persistence(mut self, adapter: Arc<dyn PersistenceAdapter>) -> Self {
        self.persistence = Some(adapter);
        self
    }

    pub fn build(self) -> Arc<MonitoredService> {
        let persistence = match self.persistence {
            Some(adapter) => OnceLock::from(adapter),
            None => OnceLock::new(),
        };

        Arc::new_cyclic(|this| MonitoredService {
            id: self.id,
            policy: self.policy,
            timer_service: self.timer_service,
            ack_timeout: self.ack_timeout,
            persistence,
            inner: Mutex::new(ServiceInner::default()),
            this: this.clone(),
        })
    }
}

impl MonitoredService {
    /// Create a healthy service with the default acknowledgment window.
    pub fn new(
        id: impl Into<ServiceId>,
        policy: EscalationPolicy,
        timer_service: Arc<dyn TimerService>,
    ) -> Arc<Self> {
        Self::builder(id, policy, timer_service).build()
    }

    pub fn builder(
        id: impl Into<ServiceId>,
        policy: EscalationPolicy,
        timer_service: Arc<dyn TimerService>,
    ) -> MonitoredServiceBuilder {
        MonitoredServiceBuilder {
            id: id.into(),
            policy,
            timer_service,
            ack_timeout: ACK_TIMEOUT,
            persistence: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    pub fn ack_timeout(&self) -> Duration {
        self.ack_timeout
    }

    /// Attach a persistence adapter if none is set yet.
    ///
    /// Returns `false` when an adapter was already attached.
    pub fn attach_persistence(&self, adapter: Arc<dyn PersistenceAdapter>) -> bool {
        self.persistence.set(adapter).is_ok()
    }

    pub fn has_persistence(&self) -> bool {
        self.persistence.get().is_some()
    }

    pub async fn state(&self) -> ServiceState {
        self.inner.lock().await.state
    }

    /// Copy of the open incident's alert.
    pub async fn current_alert(&self) -> Option<Alert> {
        self.inner.lock().await.current_alert.clone()
    }

    pub async fn has_active_timer(&self) -> bool {
        self.inner.lock().await.timer.is_some()
    }

    pub async fn snapshot(&self) -> ServiceSnapshot {
        let inner = self.inner.lock().await;
        self.snapshot_of(&inner)
    }

    /// Open an incident if the service is healthy.
    ///
    /// Alerts arriving while an incident is open are dropped; the open
    /// incident keeps its level, timer and notified set.
    pub async fn receive_alert(&self, alert: Alert) {
        self.run_to_completion("alert", move |service| async move {
            service.apply_alert(alert).await
        })
        .await;
    }

    /// Close any open incident and cancel its timer.
    pub async fn receive_healthy(&self) {
        self.run_to_completion("healthy", |service| async move {
            service.apply_healthy().await
        })
        .await;
    }

    /// Acknowledge the open incident, halting escalation.
    ///
    /// Repeated acknowledgments and acknowledgments with no incident are no-ops.
    pub async fn acknowledge(&self) {
        self.run_to_completion("acknowledge", |service| async move {
            service.apply_acknowledge().await
        })
        .await;
    }

    /// Apply a previously saved snapshot without notifying anyone.
    ///
    /// An unhealthy, unacknowledged incident gets a fresh acknowledgment
    /// timer since timers do not outlive the process.
    pub async fn restore(&self, snapshot: ServiceSnapshot) {
        self.run_to_completion("restore", move |service| async move {
            service.apply_restore(snapshot).await
        })
        .await;
    }

    async fn on_ack_timeout(&self, generation: u64) {
        self.run_to_completion("ack timeout", move |service| async move {
            service.apply_ack_timeout(generation).await
        })
        .await;
    }

    /// Run one event on its own task and wait for it.
    ///
    /// A transition holds the lock across target deliveries; on a separate
    /// task it still finishes, timer included, when the caller is dropped.
    async fn run_to_completion<F, Fut>(&self, event: &'static str, transition: F)
    where
        F: FnOnce(Arc<MonitoredService>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Some(service) = self.this.upgrade() else {
            return;
        };
        if let Err(e) = tokio::spawn(transition(service)).await {
            error!("{} event on service '{}' did not complete: {}", event, self.id, e);
        }
    }

    async fn apply_alert(&self, alert: Alert) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if inner.state == ServiceState::Unhealthy {
            debug!(
                "Service '{}' already has an open incident, dropping alert: {}",
                self.id,
                alert.message()
            );
            return;
        }

        info!("Service '{}' is unhealthy: {}", self.id, alert.message());
        inner.state = ServiceState::Unhealthy;
        inner.current_alert = Some(alert.into_incident());

        self.notify_current_level(inner).await;
        self.start_ack_timer(inner);
        self.persist(inner).await;
    }

    async fn apply_healthy(&self) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if inner.state == ServiceState::Unhealthy {
            info!("Service '{}' recovered", self.id);
        }

        inner.state = ServiceState::Healthy;
        if let Some(timer) = inner.timer.take() {
            self.timer_service.cancel_timer(timer.handle);
        }
        inner.current_alert = None;

        self.persist(inner).await;
    }

    async fn apply_acknowledge(&self) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        let Some(alert) = inner.current_alert.as_mut() else {
            debug!("No open incident on service '{}' to acknowledge", self.id);
            return;
        };

        if !alert.acknowledge() {
            debug!("Incident on service '{}' already acknowledged", self.id);
            return;
        }

        info!(
            "Incident on service '{}' acknowledged at level {}",
            self.id,
            alert.escalation_level()
        );
        if let Some(timer) = inner.timer.take() {
            self.timer_service.cancel_timer(timer.handle);
        }

        self.persist(inner).await;
    }

    async fn apply_restore(&self, snapshot: ServiceSnapshot) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if let Some(timer) = inner.timer.take() {
            self.timer_service.cancel_timer(timer.handle);
        }

        match (snapshot.state, snapshot.alert) {
            (ServiceState::Unhealthy, Some(alert)) => {
                let alert = alert.into_alert(self.id.clone());
                let pending = !alert.is_acknowledged();
                info!(
                    "Restored open incident on service '{}' at level {}",
                    self.id,
                    alert.escalation_level()
                );
                inner.state = ServiceState::Unhealthy;
                inner.current_alert = Some(alert);
                if pending {
                    self.start_ack_timer(inner);
                }
            }
            (ServiceState::Unhealthy, None) => {
                warn!(
                    "Snapshot for service '{}' is unhealthy without an alert, restoring as healthy",
                    self.id
                );
                inner.state = ServiceState::Healthy;
                inner.current_alert = None;
            }
            (ServiceState::Healthy, _) => {
                inner.state = ServiceState::Healthy;
                inner.current_alert = None;
            }
        }
    }

    async fn apply_ack_timeout(&self, generation: u64) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        match inner.timer {
            Some(timer) if timer.generation == generation => {}
            _ => {
                debug!(
                    "Ignoring stale acknowledgment timer {} on service '{}'",
                    generation, self.id
                );
                return;
            }
        }
        inner.timer = None;

        let Some(alert) = inner.current_alert.as_mut() else {
            return;
        };
        if alert.is_acknowledged() {
            return;
        }

        if self.policy.is_last_level(alert.escalation_level()) {
            warn!(
                "Incident on service '{}' unacknowledged at final level {}, no further escalation",
                self.id,
                alert.escalation_level()
            );
            self.persist(inner).await;
            return;
        }

        let level = alert.escalate();
        info!(
            "Incident on service '{}' unacknowledged, escalating to level {}",
            self.id, level
        );

        self.notify_current_level(inner).await;
        self.start_ack_timer(inner);
        self.persist(inner).await;
    }

    /// Notify every target of the current level not yet notified for this incident.
    ///
    /// Deliveries run concurrently and all settle before this returns. A
    /// failed delivery is logged and left unrecorded.
    async fn notify_current_level(&self, inner: &mut ServiceInner) {
        let Some(alert) = inner.current_alert.as_mut() else {
            return;
        };
        let Some(level) = self.policy.level(alert.escalation_level()) else {
            debug!(
                "Service '{}' has no escalation level {}, nobody to notify",
                self.id,
                alert.escalation_level()
            );
            return;
        };

        let mut seen = HashSet::new();
        let pending: Vec<&Arc<dyn Target>> = level
            .targets()
            .iter()
            .filter(|target| !alert.has_notified(target.id()) && seen.insert(target.id()))
            .collect();
        if pending.is_empty() {
            return;
        }

        let view = alert.clone();
        let results = join_all(pending.iter().map(|target| target.notify(&view))).await;

        for (target, result) in pending.into_iter().zip(results) {
            match result {
                Ok(()) => {
                    debug!(
                        "Notified {} target '{}' for service '{}'",
                        target.kind(),
                        target.id(),
                        self.id
                    );
                    alert.mark_notified(target.id());
                }
                Err(e) => {
                    warn!(
                        "Failed to notify target '{}' for service '{}': {}",
                        target.id(),
                        self.id,
                        e
                    );
                }
            }
        }
    }

    fn start_ack_timer(&self, inner: &mut ServiceInner) {
        inner.timer_generation += 1;
        let generation = inner.timer_generation;

        let service = self.this.clone();
        let callback: TimerCallback = Box::new(move || {
            async move {
                if let Some(service) = service.upgrade() {
                    service.on_ack_timeout(generation).await;
                }
            }
            .boxed()
        });

        let handle = self.timer_service.start_timer(self.ack_timeout, callback);
        debug!(
            "Started acknowledgment timer {} on service '{}' ({:?})",
            handle, self.id, self.ack_timeout
        );
        inner.timer = Some(ActiveTimer { handle, generation });
    }

    fn snapshot_of(&self, inner: &ServiceInner) -> ServiceSnapshot {
        ServiceSnapshot {
            id: self.id.clone(),
            state: inner.state,
            alert: inner.current_alert.as_ref().map(AlertSnapshot::from),
        }
    }

    async fn persist(&self, inner: &ServiceInner) {
        let Some(adapter) = self.persistence.get() else {
            return;
        };
        let snapshot = self.snapshot_of(inner);
        if let Err(e) = adapter.save_service(&self.id, &snapshot).await {
            warn!("Failed to save state of service '{}': {}", self.id, e);
        }
    }
}

impl std::fmt::Debug for MonitoredService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitoredService")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .field("ack_timeout", &self.ack_timeout)
            .finish_non_exhaustive()
    }
}
