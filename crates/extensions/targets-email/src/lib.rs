//! # Pager Email Targets
//!
//! Notification target that pages a responder by email. Delivery goes
//! through an [`EmailService`] so the transport can be swapped without
//! touching escalation policies.

mod target;
mod transport;

pub use target::EmailTarget;
pub use transport::{EmailError, EmailService, LogEmailService};
