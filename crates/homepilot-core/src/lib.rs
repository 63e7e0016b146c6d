//! Device-state synchronization between a Homepilot hub and a smart-home host.
//!
//! - **[`Registry`]**: Discovery controller. Lists the hub's actuators,
//!   filters them by model code, and reconciles them against accessories the
//!   host restored from its cache: new devices get an accessory registered
//!   once, known ones get a fresh [`BlindAdapter`] bound to their record.
//!
//! - **[`BlindAdapter`]**: One per blind. Serves the window-covering
//!   characteristics (current/target position, position state, obstruction)
//!   by issuing hub calls, and applies the inverted-orientation transform on
//!   every value crossing the hub boundary.
//!
//! - **Host contract** ([`host`]): [`AccessoryHandle`] and [`HostPlatform`]
//!   traits the host implements, plus an in-memory implementation.
//!
//! - **Domain model** ([`model`]): [`Position`], [`Orientation`],
//!   [`PositionState`] and accessory identity.

pub mod adapter;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod registry;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapter::{BlindAdapter, BlindState};
pub use config::PlatformConfig;
pub use error::CoreError;
pub use host::{
    AccessoryHandle, Characteristic, CharacteristicValue, HostPlatform, Service, SharedAccessory,
};
pub use registry::{DiscoveryReport, Registry, RegistryEntry};

pub use homepilot_api::Error as ApiError;

pub use model::{
    AccessoryContext, Orientation, Position, PositionState, SUPPORTED_DEVICE_NUMBERS,
    accessory_uuid, is_supported_device,
};
