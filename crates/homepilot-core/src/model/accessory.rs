// ── Accessory identity ──
//
// Stable accessory UUIDs and the metadata copied from the hub descriptor
// into the host's per-accessory context bag.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use homepilot_api::DeviceDescriptor;

pub const MANUFACTURER: &str = "Rademacher";

/// Model codes of the window-covering actuators this bridge drives.
pub const SUPPORTED_DEVICE_NUMBERS: [&str; 11] = [
    "27601565",
    "35000864",
    "14234511",
    "35000662",
    "36500172",
    "36500572_A",
    "16234511_A",
    "16234511_S",
    "45059071",
    "31500162",
    "23602075",
];

/// Namespace for deriving accessory UUIDs from hub device ids.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6c7a_1e0f_3b52_4d8e_9a41_0c5e_77b2_d913);

pub fn is_supported_device(device_number: &str) -> bool {
    SUPPORTED_DEVICE_NUMBERS.contains(&device_number)
}

/// Deterministic accessory UUID for a hub `did` (UUID v5).
pub fn accessory_uuid(did: &str) -> Uuid {
    Uuid::new_v5(&ACCESSORY_NAMESPACE, did.as_bytes())
}

/// Metadata persisted alongside the accessory by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryContext {
    pub manufacturer: String,
    pub model: String,
    pub serial: String,
}

impl AccessoryContext {
    pub fn from_descriptor(descriptor: &DeviceDescriptor) -> Self {
        Self {
            manufacturer: MANUFACTURER.into(),
            model: descriptor.device_number.clone(),
            serial: descriptor.did.clone(),
        }
    }
}
