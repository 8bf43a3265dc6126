//! In-memory snapshot store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pager_protocols::{PagerError, PersistenceAdapter, ServiceSnapshot};

/// Snapshot store that lives only as long as the process.
#[derive(Default)]
pub struct MemoryPersistence {
    snapshots: RwLock<HashMap<String, ServiceSnapshot>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.snapshots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.snapshots.read().await.is_empty()
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryPersistence {
    async fn save_service(
        &self,
        service_id: &str,
        snapshot: &ServiceSnapshot,
    ) -> Result<(), PagerError> {
        let mut store = self.snapshots.write().await;
        store.insert(service_id.to_string(), snapshot.clone());
        Ok(())
    }

    async fn load_service(&self, service_id: &str) -> Result<Option<ServiceSnapshot>, PagerError> {
        let store = self.snapshots.read().await;
        Ok(store.get(service_id).cloned())
    }
}
