//! Target trait definition.

use async_trait::async_trait;

use crate::error::PagerError;
use crate::types::Alert;

/// A notification sink addressed by a stable id.
///
/// The id is what duplicate suppression keys on, so two targets sharing
/// an id are treated as the same recipient within an incident.
#[async_trait]
pub trait Target: Send + Sync {
    /// Stable target id.
    fn id(&self) -> &str;

    /// Target kind, used for logging.
    fn kind(&self) -> &str {
        "custom"
    }

    /// Deliver a notification for `alert`.
    async fn notify(&self, alert: &Alert) -> Result<(), PagerError>;
}
