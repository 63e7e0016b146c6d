// ── In-memory host ──
//
// A host platform that keeps everything in process memory and records every
// interaction. Backs the command-line tool and the test suites.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use super::{
    AccessoryHandle, Characteristic, CharacteristicValue, HostPlatform, Service, SharedAccessory,
};
use crate::model::AccessoryContext;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Accessory record kept by [`InMemoryHost`].
#[derive(Debug)]
pub struct InMemoryAccessory {
    uuid: Uuid,
    display_name: String,
    services: Vec<(Service, String)>,
    context: Mutex<Option<AccessoryContext>>,
    values: DashMap<Characteristic, CharacteristicValue>,
    history: Mutex<Vec<CharacteristicValue>>,
    reachable: AtomicBool,
}

impl InMemoryAccessory {
    /// Build an accessory carrying an information service and a
    /// window-covering service, both named after the accessory.
    pub fn new(display_name: impl Into<String>, uuid: Uuid) -> Self {
        let display_name = display_name.into();
        let services = vec![
            (Service::AccessoryInformation, display_name.clone()),
            (Service::WindowCovering, display_name.clone()),
        ];
        Self {
            uuid,
            display_name,
            services,
            context: Mutex::new(None),
            values: DashMap::new(),
            history: Mutex::new(Vec::new()),
            reachable: AtomicBool::new(false),
        }
    }

    /// Name of `service`, if the accessory carries it.
    pub fn service_name(&self, service: Service) -> Option<&str> {
        self.services
            .iter()
            .find(|(s, _)| *s == service)
            .map(|(_, name)| name.as_str())
    }

    /// Latest value pushed for a characteristic.
    pub fn value(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        self.values.get(&characteristic).map(|v| v.value().clone())
    }

    /// Every value pushed, oldest first.
    pub fn history(&self) -> Vec<CharacteristicValue> {
        lock(&self.history).clone()
    }

    /// Values pushed for one characteristic, oldest first.
    pub fn history_of(&self, characteristic: Characteristic) -> Vec<CharacteristicValue> {
        lock(&self.history)
            .iter()
            .filter(|v| v.characteristic() == characteristic)
            .cloned()
            .collect()
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable.load(Ordering::Relaxed)
    }
}

impl AccessoryHandle for InMemoryAccessory {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn context(&self) -> Option<AccessoryContext> {
        lock(&self.context).clone()
    }

    fn set_context(&self, context: AccessoryContext) {
        *lock(&self.context) = Some(context);
    }

    fn update_characteristic(&self, value: CharacteristicValue) {
        let characteristic = value.characteristic();
        debug!(
            uuid = %self.uuid,
            service = %characteristic.service(),
            %characteristic,
            %value,
            "characteristic updated"
        );
        lock(&self.history).push(value.clone());
        self.values.insert(characteristic, value);
    }

    fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::Relaxed);
    }
}

/// Host platform that keeps its accessory cache in memory.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    accessories: DashMap<Uuid, Arc<InMemoryAccessory>>,
    registered: DashMap<Uuid, usize>,
    unregistered: Mutex<Vec<Uuid>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an accessory restored from a previous run's cache.
    ///
    /// The record is already registered; hand it to
    /// [`Registry::configure_accessory`](crate::Registry::configure_accessory).
    pub fn restore(&self, display_name: &str, uuid: Uuid) -> Arc<InMemoryAccessory> {
        let accessory = Arc::new(InMemoryAccessory::new(display_name, uuid));
        self.accessories.insert(uuid, Arc::clone(&accessory));
        self.registered.insert(uuid, 0);
        accessory
    }

    /// Look up an accessory this host created or restored.
    pub fn accessory(&self, uuid: Uuid) -> Option<Arc<InMemoryAccessory>> {
        self.accessories.get(&uuid).map(|a| Arc::clone(a.value()))
    }

    /// UUIDs currently in the host's cache.
    pub fn registered_uuids(&self) -> Vec<Uuid> {
        self.registered.iter().map(|r| *r.key()).collect()
    }

    /// How many times `register_accessories` was called for `uuid`.
    pub fn registration_count(&self, uuid: Uuid) -> usize {
        self.registered.get(&uuid).map_or(0, |c| *c.value())
    }

    pub fn is_registered(&self, uuid: Uuid) -> bool {
        self.registered.contains_key(&uuid)
    }

    /// UUIDs passed to `unregister_accessories`, in call order.
    pub fn unregistered(&self) -> Vec<Uuid> {
        lock(&self.unregistered).clone()
    }
}

impl HostPlatform for InMemoryHost {
    fn create_accessory(&self, display_name: &str, uuid: Uuid) -> SharedAccessory {
        let accessory = Arc::new(InMemoryAccessory::new(display_name, uuid));
        self.accessories.insert(uuid, Arc::clone(&accessory));
        accessory
    }

    fn register_accessories(&self, accessories: &[SharedAccessory]) {
        for accessory in accessories {
            *self.registered.entry(accessory.uuid()).or_insert(0) += 1;
        }
    }

    fn unregister_accessories(&self, accessories: &[SharedAccessory]) {
        let mut log = lock(&self.unregistered);
        for accessory in accessories {
            let uuid = accessory.uuid();
            self.registered.remove(&uuid);
            self.accessories.remove(&uuid);
            log.push(uuid);
        }
    }
}
