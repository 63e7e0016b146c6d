// ── Host platform contract ──
//
// The smart-home host owns the accessory object model. The core only needs
// a handful of capabilities from it, expressed as object-safe traits so
// any host (or a test double) can be injected.

pub mod memory;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::model::{AccessoryContext, Position, PositionState};

/// Services an accessory exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum Service {
    AccessoryInformation,
    WindowCovering,
}

/// Characteristics served for each blind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Characteristic {
    CurrentPosition,
    TargetPosition,
    PositionState,
    ObstructionDetected,
    Manufacturer,
    Model,
    SerialNumber,
}

impl Characteristic {
    pub fn service(self) -> Service {
        match self {
            Self::Manufacturer | Self::Model | Self::SerialNumber => Service::AccessoryInformation,
            Self::CurrentPosition
            | Self::TargetPosition
            | Self::PositionState
            | Self::ObstructionDetected => Service::WindowCovering,
        }
    }

    pub fn is_writable(self) -> bool {
        matches!(self, Self::TargetPosition)
    }
}

/// A typed characteristic value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "characteristic", content = "value", rename_all = "kebab-case")]
pub enum CharacteristicValue {
    CurrentPosition(Position),
    TargetPosition(Position),
    PositionState(PositionState),
    ObstructionDetected(bool),
    Manufacturer(String),
    Model(String),
    SerialNumber(String),
}

impl CharacteristicValue {
    pub fn characteristic(&self) -> Characteristic {
        match self {
            Self::CurrentPosition(_) => Characteristic::CurrentPosition,
            Self::TargetPosition(_) => Characteristic::TargetPosition,
            Self::PositionState(_) => Characteristic::PositionState,
            Self::ObstructionDetected(_) => Characteristic::ObstructionDetected,
            Self::Manufacturer(_) => Characteristic::Manufacturer,
            Self::Model(_) => Characteristic::Model,
            Self::SerialNumber(_) => Characteristic::SerialNumber,
        }
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentPosition(p) | Self::TargetPosition(p) => write!(f, "{p}"),
            Self::PositionState(s) => write!(f, "{s}"),
            Self::ObstructionDetected(b) => write!(f, "{b}"),
            Self::Manufacturer(s) | Self::Model(s) | Self::SerialNumber(s) => f.write_str(s),
        }
    }
}

/// An accessory record owned by the host.
///
/// Handles are opaque: the core never sees the host's object model, only
/// these capabilities. Implementations must tolerate concurrent calls.
pub trait AccessoryHandle: Send + Sync + fmt::Debug {
    fn uuid(&self) -> Uuid;

    fn display_name(&self) -> String;

    /// The persisted context bag, if one was ever written.
    fn context(&self) -> Option<AccessoryContext>;

    fn set_context(&self, context: AccessoryContext);

    /// Push a value to the service that owns the characteristic.
    fn update_characteristic(&self, value: CharacteristicValue);

    fn set_reachable(&self, reachable: bool);
}

pub type SharedAccessory = Arc<dyn AccessoryHandle>;

/// The host's accessory lifecycle.
pub trait HostPlatform: Send + Sync {
    /// Build a new, unregistered accessory carrying a window-covering
    /// service named after the accessory.
    fn create_accessory(&self, display_name: &str, uuid: Uuid) -> SharedAccessory;

    /// Persist accessories in the host's cache and start serving them.
    fn register_accessories(&self, accessories: &[SharedAccessory]);

    /// Drop accessories from the host's cache.
    fn unregister_accessories(&self, accessories: &[SharedAccessory]);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn characteristic_parses_kebab_case() {
        let c: Characteristic = "current-position".parse().unwrap();
        assert_eq!(c, Characteristic::CurrentPosition);
        assert_eq!(Characteristic::ObstructionDetected.to_string(), "obstruction-detected");
    }

    #[test]
    fn only_target_position_is_writable() {
        let writable: Vec<_> = Characteristic::iter().filter(|c| c.is_writable()).collect();
        assert_eq!(writable, vec![Characteristic::TargetPosition]);
    }

    #[test]
    fn information_characteristics_live_on_information_service() {
        assert_eq!(
            Characteristic::SerialNumber.service(),
            Service::AccessoryInformation
        );
        assert_eq!(
            Characteristic::PositionState.service(),
            Service::WindowCovering
        );
    }

    #[test]
    fn value_knows_its_characteristic() {
        let v = CharacteristicValue::PositionState(PositionState::Stopped);
        assert_eq!(v.characteristic(), Characteristic::PositionState);
        assert_eq!(v.to_string(), "stopped");
    }

    #[test]
    fn value_serializes_tagged() {
        let v = CharacteristicValue::CurrentPosition(Position::new(40).unwrap());
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            serde_json::json!({ "characteristic": "current-position", "value": 40 })
        );
    }
}
