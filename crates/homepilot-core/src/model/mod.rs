// ── Domain model ──

pub mod accessory;
pub mod position;

pub use accessory::{
    AccessoryContext, MANUFACTURER, SUPPORTED_DEVICE_NUMBERS, accessory_uuid, is_supported_device,
};
pub use position::{Orientation, Position, PositionState};
