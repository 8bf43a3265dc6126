//! Deterministic collaborators for exercising the escalation core.
//!
//! [`ManualTimerService`] never fires on its own; tests fire callbacks
//! explicitly, including callbacks of timers that were already cancelled,
//! to reproduce cancel/expiry races. [`RecordingTarget`] records every
//! delivery and can be switched into a failing mode.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use pager_protocols::{Alert, PagerError, Target, TimerCallback, TimerHandle, TimerService};

/// Timer service driven by the test.
#[derive(Default)]
pub struct ManualTimerService {
    next_id: AtomicU64,
    callbacks: Mutex<HashMap<TimerHandle, TimerCallback>>,
    started: Mutex<Vec<(TimerHandle, Duration)>>,
    cancelled: Mutex<Vec<TimerHandle>>,
}

impl ManualTimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `start_timer` calls so far.
    pub fn start_count(&self) -> usize {
        self.started.lock().unwrap().len()
    }

    /// Number of `cancel_timer` calls so far, duplicates included.
    pub fn cancel_count(&self) -> usize {
        self.cancelled.lock().unwrap().len()
    }

    /// Handles in the order they were started.
    pub fn started(&self) -> Vec<(TimerHandle, Duration)> {
        self.started.lock().unwrap().clone()
    }

    /// Handles in the order they were cancelled.
    pub fn cancelled(&self) -> Vec<TimerHandle> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn is_cancelled(&self, handle: TimerHandle) -> bool {
        self.cancelled.lock().unwrap().contains(&handle)
    }

    /// Most recently started handle.
    pub fn last_handle(&self) -> Option<TimerHandle> {
        self.started.lock().unwrap().last().map(|(h, _)| *h)
    }

    /// Run the callback registered for `handle`, even if it was cancelled.
    ///
    /// Returns `false` if the callback already ran or the handle is unknown.
    pub async fn fire(&self, handle: TimerHandle) -> bool {
        // Release the lock before running: the callback may start a new timer.
        let callback = self.callbacks.lock().unwrap().remove(&handle);
        match callback {
            Some(callback) => {
                callback().await;
                true
            }
            None => false,
        }
    }

    /// Fire the most recently started timer.
    pub async fn fire_last(&self) -> bool {
        match self.last_handle() {
            Some(handle) => self.fire(handle).await,
            None => false,
        }
    }
}

impl TimerService for ManualTimerService {
    fn start_timer(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.callbacks.lock().unwrap().insert(handle, callback);
        self.started.lock().unwrap().push((handle, delay));
        handle
    }

    fn cancel_timer(&self, handle: TimerHandle) {
        self.cancelled.lock().unwrap().push(handle);
    }
}

/// Target that records deliveries in memory.
pub struct RecordingTarget {
    id: String,
    failing: AtomicBool,
    delay: Option<Duration>,
    attempts: AtomicU64,
    delivered: Mutex<Vec<Alert>>,
}

impl RecordingTarget {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            failing: AtomicBool::new(false),
            delay: None,
            attempts: AtomicU64::new(0),
            delivered: Mutex::new(Vec::new()),
        }
    }

    /// A target whose deliveries fail until [`set_failing`](Self::set_failing) clears it.
    pub fn failing(id: impl Into<String>) -> Self {
        let target = Self::new(id);
        target.set_failing(true);
        target
    }

    /// Sleep for `delay` inside every delivery.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Successful deliveries.
    pub fn notification_count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }

    /// Delivery attempts, failed ones included.
    pub fn attempt_count(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn notifications(&self) -> Vec<Alert> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl Target for RecordingTarget {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &str {
        "recording"
    }

    async fn notify(&self, alert: &Alert) -> Result<(), PagerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(PagerError::notification(&self.id, "simulated delivery failure"));
        }
        self.delivered.lock().unwrap().push(alert.clone());
        Ok(())
    }
}
