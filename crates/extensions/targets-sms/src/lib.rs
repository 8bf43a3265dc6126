//! # Pager SMS Targets
//!
//! Pages a phone number with a one-line text message.

mod target;
mod transport;

pub use target::SmsTarget;
pub use transport::{LogSmsService, SmsError, SmsService};
