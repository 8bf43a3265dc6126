//! Timer service capability.

use std::fmt;
use std::time::Duration;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Callback run when a timer fires.
///
/// The callback is invoked at most once and only if the timer was not
/// cancelled first. It returns a future so it can re-enter async code.
pub type TimerCallback = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Opaque reference to a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wrap a raw handle value issued by a timer service.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Delayed, cancellable callbacks.
pub trait TimerService: Send + Sync {
    /// Schedule `callback` to run once after `delay`.
    fn start_timer(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a pending timer.
    ///
    /// Must be idempotent: cancelling twice, or cancelling a timer that
    /// already fired, is a no-op.
    fn cancel_timer(&self, handle: TimerHandle);
}
