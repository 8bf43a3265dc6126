//! Tokio timer service.

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::AbortHandle;
use tracing::debug;

use pager_protocols::{TimerCallback, TimerHandle, TimerService};

#[derive(Default)]
struct PendingTimer {
    task: Option<AbortHandle>,
}

/// Timer service backed by the tokio runtime.
///
/// `start_timer` spawns a task, so it must be called from within a Tokio runtime.
#[derive(Default)]
pub struct TokioTimerService {
    next_id: AtomicU64,
    pending: Arc<DashMap<TimerHandle, PendingTimer>>,
}

impl TokioTimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers that have neither fired nor been cancelled.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&self) {
        let handles: Vec<TimerHandle> = self.pending.iter().map(|e| *e.key()).collect();
        for handle in handles {
            self.cancel_timer(handle);
        }
    }
}

impl TimerService for TokioTimerService {
    fn start_timer(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        // Register before spawning so a zero delay cannot outrun the entry.
        self.pending.insert(handle, PendingTimer::default());

        let pending = self.pending.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if pending.remove(&handle).is_none() {
                return;
            }
            debug!("Timer {} fired", handle);
            callback().await;
        });

        if let Some(mut entry) = self.pending.get_mut(&handle) {
            entry.task = Some(task.abort_handle());
        }

        debug!("Timer {} scheduled in {:?}", handle, delay);
        handle
    }

    fn cancel_timer(&self, handle: TimerHandle) {
        if let Some((_, timer)) = self.pending.remove(&handle) {
            if let Some(task) = timer.task {
                task.abort();
            }
            debug!("Timer {} cancelled", handle);
        }
    }
}

impl Drop for TokioTimerService {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
