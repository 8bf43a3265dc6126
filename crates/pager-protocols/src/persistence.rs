//! Persistence boundary.

use async_trait::async_trait;

use crate::error::PagerError;
use crate::snapshot::ServiceSnapshot;

/// Snapshot storage used to survive process restarts.
///
/// The escalation core never depends on the result of a save; callers
/// log failures and carry on.
#[async_trait]
pub trait PersistenceAdapter: Send + Sync {
    /// Store the latest snapshot for a service, replacing any previous one.
    async fn save_service(&self, service_id: &str, snapshot: &ServiceSnapshot)
        -> Result<(), PagerError>;

    /// Load the latest snapshot for a service, if one was saved.
    async fn load_service(&self, service_id: &str) -> Result<Option<ServiceSnapshot>, PagerError>;
}
