// ── Registry / discovery controller ──
//
// Brings the in-memory accessory set into agreement with the hub's
// actuator list. New devices get an accessory registered once; known ones
// (including records the host restored from its cache) get a fresh adapter
// bound to the existing record.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use homepilot_api::{DeviceDescriptor, HubClient};

use crate::adapter::BlindAdapter;
use crate::config::PlatformConfig;
use crate::error::CoreError;
use crate::host::{HostPlatform, SharedAccessory};
use crate::model::{accessory_uuid, is_supported_device};

/// One accessory known to the registry.
#[derive(Debug, Clone)]
pub enum RegistryEntry {
    /// Restored from the host cache, not yet seen by discovery.
    Restored(SharedAccessory),
    /// Live, with an adapter serving its characteristics.
    Bound(Arc<BlindAdapter>),
}

impl RegistryEntry {
    pub fn accessory(&self) -> SharedAccessory {
        match self {
            Self::Restored(accessory) => Arc::clone(accessory),
            Self::Bound(adapter) => Arc::clone(adapter.accessory()),
        }
    }

    pub fn adapter(&self) -> Option<&Arc<BlindAdapter>> {
        match self {
            Self::Bound(adapter) => Some(adapter),
            Self::Restored(_) => None,
        }
    }
}

/// What one discovery cycle did, by hub `did` (or UUID for pruned records).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoveryReport {
    pub added: Vec<String>,
    pub rebound: Vec<String>,
    pub skipped: Vec<String>,
    pub pruned: Vec<Uuid>,
}

impl DiscoveryReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.rebound.is_empty()
            && self.skipped.is_empty()
            && self.pruned.is_empty()
    }
}

/// Owns the UUID -> accessory mapping for one bridge instance.
pub struct Registry {
    config: PlatformConfig,
    client: HubClient,
    host: Arc<dyn HostPlatform>,
    accessories: DashMap<Uuid, RegistryEntry>,
}

impl Registry {
    /// Create a registry talking to the hub described by `config`.
    pub fn new(config: PlatformConfig, host: Arc<dyn HostPlatform>) -> Result<Self, CoreError> {
        let client = config.hub_client()?;
        Ok(Self::with_client(config, client, host))
    }

    /// Create a registry with a pre-built hub client.
    pub fn with_client(
        config: PlatformConfig,
        client: HubClient,
        host: Arc<dyn HostPlatform>,
    ) -> Self {
        Self {
            config,
            client,
            host,
            accessories: DashMap::new(),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    // ── Host callbacks ───────────────────────────────────────────────

    /// Accept an accessory the host restored from its cache.
    ///
    /// Called once per cached record before discovery runs, so discovery
    /// rebinds it instead of registering a duplicate.
    pub fn configure_accessory(&self, accessory: SharedAccessory) {
        debug!(uuid = %accessory.uuid(), name = %accessory.display_name(), "restored accessory");
        self.accessories
            .insert(accessory.uuid(), RegistryEntry::Restored(accessory));
    }

    /// The host finished launching: run the initial discovery.
    pub async fn did_finish_launching(&self) -> DiscoveryReport {
        self.discover().await
    }

    /// Deregister an accessory with the host and forget it.
    pub fn remove_accessory(&self, accessory: &SharedAccessory) {
        info!(uuid = %accessory.uuid(), "[{}] Removed from host", accessory.display_name());
        self.accessories.remove(&accessory.uuid());
        self.host
            .unregister_accessories(std::slice::from_ref(accessory));
    }

    // ── Discovery ────────────────────────────────────────────────────

    /// Run one discovery cycle. Failures are logged and yield an empty
    /// report; nothing is retried.
    pub async fn discover(&self) -> DiscoveryReport {
        match self.try_discover().await {
            Ok(report) => {
                info!(
                    added = report.added.len(),
                    rebound = report.rebound.len(),
                    skipped = report.skipped.len(),
                    pruned = report.pruned.len(),
                    "discovery complete"
                );
                report
            }
            Err(e) => {
                error!(error = %e, "discovery failed");
                DiscoveryReport::default()
            }
        }
    }

    /// Run one discovery cycle, surfacing the failure.
    pub async fn try_discover(&self) -> Result<DiscoveryReport, CoreError> {
        let devices = self
            .client
            .list_actuators()
            .await
            .map_err(CoreError::from_discovery)?;

        let mut report = DiscoveryReport::default();
        let mut seen = HashSet::new();

        for descriptor in devices {
            if !is_supported_device(&descriptor.device_number) {
                debug!(
                    did = %descriptor.did,
                    device_number = %descriptor.device_number,
                    "skipping unsupported device"
                );
                report.skipped.push(descriptor.did);
                continue;
            }

            let uuid = accessory_uuid(&descriptor.did);
            seen.insert(uuid);

            // Clone out of the map before inserting; holding a shard guard
            // across `insert` would deadlock.
            let existing = self.accessories.get(&uuid).map(|e| e.accessory());
            match existing {
                None => {
                    self.add_accessory(&descriptor, uuid);
                    report.added.push(descriptor.did);
                }
                Some(accessory) => {
                    info!("Online: {} [{}]", accessory.display_name(), descriptor.did);
                    let adapter = self.bind(accessory, &descriptor);
                    self.accessories
                        .insert(uuid, RegistryEntry::Bound(adapter));
                    report.rebound.push(descriptor.did);
                }
            }
        }

        if self.config.prune_missing {
            report.pruned = self.prune_except(&seen);
        }

        Ok(report)
    }

    // ── Lookups ──────────────────────────────────────────────────────

    pub fn entry(&self, uuid: Uuid) -> Option<RegistryEntry> {
        self.accessories.get(&uuid).map(|e| e.value().clone())
    }

    pub fn adapter(&self, uuid: Uuid) -> Option<Arc<BlindAdapter>> {
        self.accessories
            .get(&uuid)
            .and_then(|e| e.value().adapter().cloned())
    }

    pub fn adapter_by_did(&self, did: &str) -> Option<Arc<BlindAdapter>> {
        self.adapter(accessory_uuid(did))
    }

    /// Every bound adapter, ordered by hub `did`.
    pub fn adapters(&self) -> Vec<Arc<BlindAdapter>> {
        let mut adapters: Vec<_> = self
            .accessories
            .iter()
            .filter_map(|e| e.value().adapter().cloned())
            .collect();
        adapters.sort_by(|a, b| a.did().cmp(b.did()));
        adapters
    }

    pub fn len(&self) -> usize {
        self.accessories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessories.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn add_accessory(&self, descriptor: &DeviceDescriptor, uuid: Uuid) {
        info!(
            "Found: {} - {} [{}]",
            descriptor.name.as_deref().unwrap_or_default(),
            descriptor.description.as_deref().unwrap_or_default(),
            descriptor.did
        );

        let accessory = self
            .host
            .create_accessory(descriptor.display_name(), uuid);
        let adapter = self.bind(Arc::clone(&accessory), descriptor);
        self.accessories
            .insert(uuid, RegistryEntry::Bound(adapter));

        self.host.register_accessories(&[accessory]);
    }

    fn bind(&self, accessory: SharedAccessory, descriptor: &DeviceDescriptor) -> Arc<BlindAdapter> {
        Arc::new(BlindAdapter::bind(
            self.client.clone(),
            accessory,
            descriptor,
            self.config.orientation(),
        ))
    }

    /// Remove every entry whose UUID is not in `keep`.
    fn prune_except(&self, keep: &HashSet<Uuid>) -> Vec<Uuid> {
        let stale: Vec<SharedAccessory> = self
            .accessories
            .iter()
            .filter(|e| !keep.contains(e.key()))
            .map(|e| e.value().accessory())
            .collect();

        let mut pruned = Vec::with_capacity(stale.len());
        for accessory in stale {
            warn!(uuid = %accessory.uuid(), name = %accessory.display_name(), "device vanished from hub");
            pruned.push(accessory.uuid());
            self.remove_accessory(&accessory);
        }
        pruned
    }
}
