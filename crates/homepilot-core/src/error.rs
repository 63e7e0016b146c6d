// ── Core error types ──
//
// Domain errors surfaced to the host's characteristic callbacks. Hub
// failures are wrapped with the device they concern so a failed get or
// set can be reported against the right accessory.

use thiserror::Error;

use crate::host::Characteristic;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Discovery ────────────────────────────────────────────────────
    #[error("Discovery failed: {message}")]
    Discovery { message: String },

    // ── Hub round-trips ──────────────────────────────────────────────
    #[error("Request failed for {resource}: {source}")]
    RequestFailed {
        resource: String,
        #[source]
        source: homepilot_api::Error,
    },

    #[error("Move command failed for device {did}: {source}")]
    CommandFailed {
        did: String,
        #[source]
        source: homepilot_api::Error,
    },

    #[error("Failed parsing position in device output for {did}")]
    PositionUnavailable { did: String },

    // ── Characteristic access ────────────────────────────────────────
    #[error("Invalid position {value}: expected 0-100")]
    InvalidPosition { value: i64 },

    #[error("Characteristic {characteristic} is read-only")]
    ReadOnly { characteristic: Characteristic },

    #[error("Accessory not found: {identifier}")]
    AccessoryNotFound { identifier: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Map a failed device-list fetch. A body without a usable device
    /// list is a discovery error; anything else is a failed request.
    pub(crate) fn from_discovery(err: homepilot_api::Error) -> Self {
        match err {
            homepilot_api::Error::MissingDeviceList => Self::Discovery {
                message: homepilot_api::Error::MissingDeviceList.to_string(),
            },
            homepilot_api::Error::Deserialization { message, .. } => Self::Discovery {
                message: format!("unrecognized device list: {message}"),
            },
            other => Self::RequestFailed {
                resource: "device list".into(),
                source: other,
            },
        }
    }

    pub(crate) fn request(did: &str, source: homepilot_api::Error) -> Self {
        Self::RequestFailed {
            resource: format!("device {did}"),
            source,
        }
    }

    /// Returns `true` if the hub could not be reached or answered badly.
    pub fn is_hub_failure(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed { .. } | Self::CommandFailed { .. } | Self::Discovery { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_list_maps_to_discovery() {
        let err = CoreError::from_discovery(homepilot_api::Error::MissingDeviceList);
        assert!(matches!(err, CoreError::Discovery { .. }));
        assert!(err.to_string().contains("No devices returned"));
    }

    #[test]
    fn status_maps_to_request_failed() {
        let err = CoreError::from_discovery(homepilot_api::Error::Status {
            status: 502,
            url: "http://hub/v4/devices".into(),
        });
        assert!(matches!(err, CoreError::RequestFailed { ref resource, .. } if resource == "device list"));
        assert!(err.is_hub_failure());
    }

    #[test]
    fn position_unavailable_is_not_a_hub_failure() {
        let err = CoreError::PositionUnavailable { did: "7".into() };
        assert!(!err.is_hub_failure());
    }
}
