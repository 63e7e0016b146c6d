// ── Device State Adapter ──
//
// One adapter per blind. Serves characteristic reads and writes by calling
// the hub, keeps the last confirmed position as the pivot for direction
// inference, and converts every position crossing the hub boundary between
// host and hub orientation.

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use homepilot_api::{DeviceDescriptor, HubClient};

use crate::error::CoreError;
use crate::host::{Characteristic, CharacteristicValue, SharedAccessory};
use crate::model::{AccessoryContext, Orientation, Position, PositionState};

/// Locally held view of a blind, in host orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BlindState {
    /// Last confirmed actual position; pivot for direction inference.
    pub last_position: Position,
    /// Most recently requested or observed target.
    pub target_position: Position,
    /// Derived locally, never polled.
    pub position_state: PositionState,
}

/// Bridge between one accessory's characteristics and one hub device.
///
/// Operations are independent futures. State changes go through a `watch`
/// channel and no lock is held across a hub call, so concurrent operations
/// interleave freely and the last response to arrive wins.
#[derive(Debug)]
pub struct BlindAdapter {
    client: HubClient,
    accessory: SharedAccessory,
    did: String,
    context: AccessoryContext,
    orientation: Orientation,
    state: watch::Sender<BlindState>,
}

impl BlindAdapter {
    /// Bind a fresh adapter to `accessory` using a freshly listed descriptor.
    ///
    /// Writes the context bag and information characteristics, seeds the
    /// state from the descriptor's reported position (0 when absent), and
    /// publishes the initial window-covering values.
    pub fn bind(
        client: HubClient,
        accessory: SharedAccessory,
        descriptor: &DeviceDescriptor,
        orientation: Orientation,
    ) -> Self {
        let context = AccessoryContext::from_descriptor(descriptor);
        accessory.set_context(context.clone());
        accessory.update_characteristic(CharacteristicValue::Manufacturer(
            context.manufacturer.clone(),
        ));
        accessory.update_characteristic(CharacteristicValue::Model(context.model.clone()));
        accessory.update_characteristic(CharacteristicValue::SerialNumber(context.serial.clone()));

        let raw = descriptor.position().map_or(Position::MIN, Position::clamped);
        let last_position = orientation.from_hub(raw);
        let initial = BlindState {
            last_position,
            target_position: last_position,
            position_state: PositionState::Stopped,
        };

        accessory.update_characteristic(CharacteristicValue::CurrentPosition(last_position));
        accessory.update_characteristic(CharacteristicValue::TargetPosition(last_position));
        accessory.update_characteristic(CharacteristicValue::PositionState(initial.position_state));
        accessory.update_characteristic(CharacteristicValue::ObstructionDetected(
            descriptor.has_errors(),
        ));
        accessory.set_reachable(true);

        let (state, _) = watch::channel(initial);

        Self {
            client,
            accessory,
            did: descriptor.did.clone(),
            context,
            orientation,
            state,
        }
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn uuid(&self) -> Uuid {
        self.accessory.uuid()
    }

    pub fn display_name(&self) -> String {
        self.accessory.display_name()
    }

    pub fn accessory(&self) -> &SharedAccessory {
        &self.accessory
    }

    pub fn context(&self) -> &AccessoryContext {
        &self.context
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Snapshot of the locally held state.
    pub fn state(&self) -> BlindState {
        *self.state.borrow()
    }

    /// Observe every local state change.
    pub fn subscribe(&self) -> watch::Receiver<BlindState> {
        self.state.subscribe()
    }

    // ── Characteristic operations ────────────────────────────────────

    /// Poll the hub for the actual position.
    ///
    /// The reading is authoritative for both the last known and the target
    /// position.
    pub async fn current_position(&self) -> Result<Position, CoreError> {
        info!(did = %self.did, name = %self.display_name(), "getting current position");

        let position = self.fetch_position().await?;
        self.state.send_modify(|s| {
            s.target_position = position;
            s.last_position = position;
        });
        Ok(position)
    }

    /// Poll the hub for the position and report it as the target.
    pub async fn target_position(&self) -> Result<Position, CoreError> {
        info!(did = %self.did, name = %self.display_name(), "getting target position");

        let position = self.fetch_position().await?;
        self.state.send_modify(|s| s.target_position = position);
        Ok(position)
    }

    /// Move the blind to `value` (host orientation).
    ///
    /// The inferred direction is published before the hub is called. A
    /// successful command is treated as an instantaneous move; a failed one
    /// returns the position state to stopped.
    pub async fn set_target_position(&self, value: Position) -> Result<Position, CoreError> {
        info!(did = %self.did, name = %self.display_name(), %value, "setting target position");

        let mut direction = PositionState::Stopped;
        self.state.send_modify(|s| {
            s.target_position = value;
            s.position_state = PositionState::toward(value, s.last_position);
            direction = s.position_state;
        });
        self.accessory
            .update_characteristic(CharacteristicValue::PositionState(direction));

        let raw = self.orientation.to_hub(value);
        debug!(did = %self.did, %direction, raw = raw.value(), "dispatching move");

        match self.client.goto_position(&self.did, raw.value()).await {
            Ok(()) => {
                self.accessory
                    .update_characteristic(CharacteristicValue::CurrentPosition(value));
                self.accessory
                    .update_characteristic(CharacteristicValue::PositionState(
                        PositionState::Stopped,
                    ));
                self.state.send_modify(|s| {
                    s.last_position = value;
                    s.position_state = PositionState::Stopped;
                });
                Ok(value)
            }
            Err(source) => {
                warn!(did = %self.did, error = %source, "move command failed");
                self.state
                    .send_modify(|s| s.position_state = PositionState::Stopped);
                self.accessory
                    .update_characteristic(CharacteristicValue::PositionState(
                        PositionState::Stopped,
                    ));
                Err(CoreError::CommandFailed {
                    did: self.did.clone(),
                    source,
                })
            }
        }
    }

    /// Cached direction of travel. No hub call.
    pub fn position_state(&self) -> PositionState {
        self.state.borrow().position_state
    }

    /// Ask the hub whether the device reports errors.
    pub async fn obstruction_detected(&self) -> Result<bool, CoreError> {
        info!(did = %self.did, name = %self.display_name(), "checking for obstruction");

        let device = self
            .client
            .get_device(&self.did)
            .await
            .map_err(|e| CoreError::request(&self.did, e))?;
        Ok(device.has_errors())
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Serve a characteristic read.
    pub async fn read(
        &self,
        characteristic: Characteristic,
    ) -> Result<CharacteristicValue, CoreError> {
        let value = match characteristic {
            Characteristic::CurrentPosition => {
                CharacteristicValue::CurrentPosition(self.current_position().await?)
            }
            Characteristic::TargetPosition => {
                CharacteristicValue::TargetPosition(self.target_position().await?)
            }
            Characteristic::PositionState => {
                CharacteristicValue::PositionState(self.position_state())
            }
            Characteristic::ObstructionDetected => {
                CharacteristicValue::ObstructionDetected(self.obstruction_detected().await?)
            }
            Characteristic::Manufacturer => {
                CharacteristicValue::Manufacturer(self.context.manufacturer.clone())
            }
            Characteristic::Model => CharacteristicValue::Model(self.context.model.clone()),
            Characteristic::SerialNumber => {
                CharacteristicValue::SerialNumber(self.context.serial.clone())
            }
        };
        Ok(value)
    }

    /// Serve a characteristic write. Only the target position is writable.
    pub async fn write(&self, value: CharacteristicValue) -> Result<CharacteristicValue, CoreError> {
        match value {
            CharacteristicValue::TargetPosition(target) => self
                .set_target_position(target)
                .await
                .map(CharacteristicValue::TargetPosition),
            other => Err(CoreError::ReadOnly {
                characteristic: other.characteristic(),
            }),
        }
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Fetch the device detail and normalize its position.
    async fn fetch_position(&self) -> Result<Position, CoreError> {
        let device = self
            .client
            .get_device(&self.did)
            .await
            .map_err(|e| CoreError::request(&self.did, e))?;

        let raw = device
            .position()
            .ok_or_else(|| CoreError::PositionUnavailable {
                did: self.did.clone(),
            })?;

        Ok(self.orientation.from_hub(Position::clamped(raw)))
    }
}
