//! Wiring of configured targets, services and storage.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use pager_config::{Config, ServiceConfig, StorageConfig, TargetConfig, TargetKind};
use pager_core::{EscalationPolicy, MonitoredService, PagerService};
use pager_protocols::{PersistenceAdapter, Target, TimerService};
use pager_store::{FilePersistence, MemoryPersistence};
use pager_targets_email::EmailTarget;
use pager_targets_sms::SmsTarget;

pub(crate) type TargetMap = HashMap<String, Arc<dyn Target>>;

fn build_target(config: &TargetConfig) -> Result<Arc<dyn Target>> {
    let target: Arc<dyn Target> = match config.kind {
        TargetKind::Email => {
            let address = config
                .address
                .as_deref()
                .ok_or_else(|| anyhow!("email target '{}' has no address", config.id))?;
            Arc::new(EmailTarget::logging(&config.id, address))
        }
        TargetKind::Sms => {
            let phone = config
                .phone_number
                .as_deref()
                .ok_or_else(|| anyhow!("sms target '{}' has no phone_number", config.id))?;
            Arc::new(SmsTarget::logging(&config.id, phone))
        }
    };
    Ok(target)
}

/// Instantiate every configured target, keyed by id.
pub(crate) fn build_targets(config: &Config) -> Result<TargetMap> {
    let mut targets = TargetMap::new();
    for target_config in &config.targets {
        let target = build_target(target_config)?;
        targets.insert(target_config.id.clone(), target);
    }
    info!("Built {} notification target(s)", targets.len());
    Ok(targets)
}

/// Resolve a service's target ids into an escalation policy.
pub(crate) fn build_policy(service: &ServiceConfig, targets: &TargetMap) -> Result<EscalationPolicy> {
    let mut levels = Vec::with_capacity(service.levels.len());
    for ids in &service.levels {
        let mut level = Vec::with_capacity(ids.len());
        for id in ids {
            let target = targets.get(id).with_context(|| {
                format!("service '{}' references unknown target '{}'", service.id, id)
            })?;
            level.push(target.clone());
        }
        levels.push(level);
    }
    Ok(EscalationPolicy::new(levels))
}

/// Register every configured service with `pager`.
pub(crate) fn register_services(
    pager: &PagerService,
    config: &Config,
    timer: Arc<dyn TimerService>,
) -> Result<usize> {
    let targets = build_targets(config)?;

    for service in &config.services {
        let policy = build_policy(service, &targets)?;
        if policy.is_empty() {
            warn!("Service '{}' has no escalation levels", service.id);
        }
        let monitored = MonitoredService::builder(&service.id, policy, timer.clone())
            .ack_timeout(config.escalation.ack_timeout())
            .build();
        pager.add_monitored_service(monitored);
    }

    info!("Registered {} monitored service(s)", config.services.len());
    Ok(config.services.len())
}

/// Open the configured snapshot store.
///
/// The file backend defaults to `<data_dir>/state` when no path is set.
pub(crate) async fn build_persistence(
    storage: &StorageConfig,
    data_dir: &Path,
) -> Result<Arc<dyn PersistenceAdapter>> {
    match storage.backend.as_str() {
        "file" => {
            let path = storage
                .resolved_path()
                .unwrap_or_else(|| data_dir.join("state"));
            let store = FilePersistence::new(&path)
                .await
                .with_context(|| format!("failed to open snapshot store at {}", path.display()))?;
            info!("Saving service snapshots under {}", path.display());
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryPersistence::new())),
        other => {
            warn!("Unknown storage backend '{}', using memory", other);
            Ok(Arc::new(MemoryPersistence::new()))
        }
    }
}

#[cfg(test)]
#[path = "register_tests.rs"]
mod tests;
