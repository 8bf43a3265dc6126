//! # Pager Protocols
//!
//! Capability definitions (traits) and shared value types for the pager.
//! Contains only interface definitions and plain records - no escalation logic.
//!
//! ## Core Traits
//!
//! - [`Target`] - A notification sink (email, SMS, ...)
//! - [`TimerService`] - Delayed, cancellable callbacks
//! - [`PersistenceAdapter`] - Best-effort snapshot storage

pub mod error;
pub mod persistence;
pub mod snapshot;
pub mod target;
pub mod timer;
pub mod types;

pub use error::PagerError;
pub use persistence::PersistenceAdapter;
pub use snapshot::{AlertSnapshot, ServiceSnapshot};
pub use target::Target;
pub use timer::{TimerCallback, TimerHandle, TimerService};
pub use types::*;
