//! File-backed snapshot store.

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use pager_protocols::{PagerError, PersistenceAdapter, ServiceSnapshot};

/// Snapshot store writing one JSON file per service.
///
/// ```text
/// {storage_path}/
/// └── services/
///     ├── {service_id}.json
///     └── ...
/// ```
pub struct FilePersistence {
    storage_path: PathBuf,
}

impl FilePersistence {
    /// Open a store rooted at `storage_path`, creating the directory if needed.
    pub async fn new(storage_path: impl Into<PathBuf>) -> Result<Self, PagerError> {
        let storage_path = storage_path.into();
        fs::create_dir_all(storage_path.join("services")).await?;

        debug!("FilePersistence initialized at {:?}", storage_path);

        Ok(Self { storage_path })
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    fn services_dir(&self) -> PathBuf {
        self.storage_path.join("services")
    }

    fn service_path(&self, service_id: &str) -> PathBuf {
        self.services_dir()
            .join(format!("{}.json", Self::encode_service_id(service_id)))
    }

    /// Encode a service id as a file name.
    ///
    /// ASCII letters, digits, `-`, `_` and `.` are kept; every other byte,
    /// `%` included, becomes `%XX`. Distinct ids always map to distinct names.
    fn encode_service_id(service_id: &str) -> String {
        let mut encoded = String::with_capacity(service_id.len());
        for byte in service_id.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
                encoded.push(char::from(byte));
            } else {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
        encoded
    }
}

#[async_trait]
impl PersistenceAdapter for FilePersistence {
    async fn save_service(
        &self,
        service_id: &str,
        snapshot: &ServiceSnapshot,
    ) -> Result<(), PagerError> {
        let path = self.service_path(service_id);
        let content = serde_json::to_string_pretty(snapshot)?;

        // Readers never see a partially written snapshot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;

        debug!("Saved state of service '{}' to {:?}", service_id, path);
        Ok(())
    }

    async fn load_service(&self, service_id: &str) -> Result<Option<ServiceSnapshot>, PagerError> {
        let path = self.service_path(service_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: ServiceSnapshot = serde_json::from_str(&content).map_err(|e| {
            PagerError::Persistence(format!("Corrupt snapshot {:?}: {}", path, e))
        })?;
        if snapshot.id != service_id {
            return Err(PagerError::Persistence(format!(
                "Snapshot {:?} belongs to service '{}', not '{}'",
                path, snapshot.id, service_id
            )));
        }
        Ok(Some(snapshot))
    }
}
