//! # Pager Timer
//!
//! [`TokioTimerService`] runs each timer as a sleeping tokio task.
//!
//! A timer is pending from `start_timer` until it either fires or is
//! cancelled, and whichever happens first removes it from the pending
//! table. The loser of that race sees no entry and does nothing, so a
//! cancelled timer never runs its callback and cancelling a fired timer
//! is a no-op.

mod service;

pub use service::TokioTimerService;
