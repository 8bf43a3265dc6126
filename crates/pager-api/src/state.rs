//! Application state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use pager_core::{AlertingService, PagerService};

/// State shared across handlers.
pub struct AppState {
    pub pager: Arc<PagerService>,
    pub alerting: AlertingService,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(pager: Arc<PagerService>) -> Self {
        Self {
            alerting: AlertingService::new(pager.clone()),
            pager,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Event requests handled so far.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(PagerService::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default() {
        let state = AppState::default();
        assert!(state.pager.is_empty());
        assert_eq!(state.request_count(), 0);
    }

    #[test]
    fn test_request_count() {
        let state = AppState::default();
        state.increment_requests();
        state.increment_requests();
        assert_eq!(state.request_count(), 2);
    }

    #[test]
    fn test_alerting_shares_registry() {
        let state = AppState::default();
        assert!(Arc::ptr_eq(state.alerting.pager(), &state.pager));
    }
}
