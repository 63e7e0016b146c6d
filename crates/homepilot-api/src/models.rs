// Hub API response types
//
// Models for the Homepilot v4 JSON API. Fields use `#[serde(default)]`
// liberally because firmware releases disagree about field presence and
// about whether identifiers are strings or numbers.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

// ── Response envelopes ───────────────────────────────────────────────

/// Body of `GET /v4/devices?devtype=Actuator`.
///
/// `devices` stays optional so a malformed body can be reported as
/// [`Error::MissingDeviceList`](crate::Error::MissingDeviceList) instead of
/// a generic decode failure. Entries stay raw until
/// [`into_descriptors`](Self::into_descriptors) decodes them one by one.
#[derive(Debug, Deserialize)]
pub struct DeviceListResponse {
    #[serde(default)]
    pub devices: Option<Vec<serde_json::Value>>,
}

impl DeviceListResponse {
    /// Decode every listed entry independently. Entries that do not decode
    /// are logged and dropped; `None` only when the list itself is absent.
    pub fn into_descriptors(self) -> Option<Vec<DeviceDescriptor>> {
        let entries = self.devices?;
        let descriptors = entries
            .into_iter()
            .filter_map(|entry| {
                let did = entry.get("did").map(ToString::to_string);
                match serde_json::from_value::<DeviceDescriptor>(entry) {
                    Ok(descriptor) => Some(descriptor),
                    Err(e) => {
                        warn!(did = ?did, error = %e, "skipping malformed device entry");
                        None
                    }
                }
            })
            .collect();
        Some(descriptors)
    }
}

/// Body of `GET /v4/devices/{did}`.
#[derive(Debug, Deserialize)]
pub struct DeviceDetailResponse {
    pub device: DeviceDetail,
}

// ── Device ───────────────────────────────────────────────────────────

/// One actuator as listed by the discovery endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    #[serde(deserialize_with = "de::string_or_number")]
    pub did: String,
    #[serde(rename = "deviceNumber", default, deserialize_with = "de::string_or_number")]
    pub device_number: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "statusesMap", default)]
    pub statuses_map: Option<StatusesMap>,
    #[serde(rename = "hasErrors", default, deserialize_with = "de::error_count")]
    pub has_errors: i64,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceDescriptor {
    /// Human-facing name: the description, unless it is blank.
    pub fn display_name(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.trim().is_empty() => desc,
            _ => self.name.as_deref().unwrap_or_default(),
        }
    }

    /// Raw hub position as reported in the device list.
    pub fn position(&self) -> Option<i64> {
        self.statuses_map.as_ref().and_then(StatusesMap::listed_position)
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors != 0
    }
}

/// Live state of one device from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDetail {
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub did: Option<String>,
    #[serde(rename = "statusesMap", default)]
    pub statuses_map: Option<StatusesMap>,
    #[serde(rename = "hasErrors", default, deserialize_with = "de::error_count")]
    pub has_errors: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DeviceDetail {
    /// Raw hub position as reported by the detail endpoint.
    pub fn position(&self) -> Option<i64> {
        self.statuses_map
            .as_ref()
            .and_then(StatusesMap::reported_position)
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors != 0
    }
}

/// Status values keyed by name.
///
/// The list endpoint spells the position key `position` while the detail
/// endpoint spells it `Position`. Both are kept; each accessor prefers the
/// spelling of its own endpoint and falls back to the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusesMap {
    #[serde(rename = "position", default, deserialize_with = "de::opt_int")]
    pub position: Option<i64>,
    #[serde(rename = "Position", default, deserialize_with = "de::opt_int")]
    pub position_capitalized: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StatusesMap {
    pub fn listed_position(&self) -> Option<i64> {
        self.position.or(self.position_capitalized)
    }

    pub fn reported_position(&self) -> Option<i64> {
        self.position_capitalized.or(self.position)
    }
}

// ── Commands ─────────────────────────────────────────────────────────

/// Body of `PUT /devices/{did}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveCommand {
    pub name: &'static str,
    pub value: u8,
}

impl MoveCommand {
    pub const GOTO_POSITION: &'static str = "GOTO_POS_CMD";

    /// Drive to an absolute raw hub position.
    pub fn goto(value: u8) -> Self {
        Self {
            name: Self::GOTO_POSITION,
            value,
        }
    }
}

// ── Lenient field decoders ───────────────────────────────────────────

mod de {
    use super::{Deserialize, Deserializer};
    use serde::de::Error as _;
    use serde_json::Value;

    fn value_to_string<E: serde::de::Error>(value: Value) -> Result<String, E> {
        match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(E::custom(format!("expected string or number, got {other}"))),
        }
    }

    pub(super) fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        value_to_string(Value::deserialize(d)?)
    }

    pub(super) fn opt_string_or_number<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            other => value_to_string(other).map(Some),
        }
    }

    /// Integer, integer string, or null. Fractions are rejected.
    pub(super) fn opt_int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        match Value::deserialize(d)? {
            Value::Null => Ok(None),
            Value::Number(n) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid integer {n}"))),
            Value::String(s) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid integer {s:?}"))),
            other => Err(D::Error::custom(format!("expected integer, got {other}"))),
        }
    }

    /// Error counter; some firmware reports a boolean instead.
    pub(super) fn error_count<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match Value::deserialize(d)? {
            Value::Bool(b) => Ok(i64::from(b)),
            Value::Null => Ok(0),
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| D::Error::custom(format!("invalid error count {n}"))),
            other => Err(D::Error::custom(format!("expected error count, got {other}"))),
        }
    }
}
