// ── Runtime platform configuration ──
//
// Describes *how* to reach the hub and how to present positions.
// Never touches disk; `homepilot-config` builds one from files and env.

use std::time::Duration;

use url::Url;

use homepilot_api::{HubClient, TransportConfig};

use crate::error::CoreError;
use crate::model::Orientation;

/// Configuration for one bridge instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Hub base URL (e.g., `http://192.168.1.20`).
    pub url: Url,
    /// Present positions as `100 - raw` to the host.
    pub inverted: bool,
    /// Transport timeout for every hub call.
    pub timeout: Duration,
    /// Unregister accessories whose device vanished from the hub's list.
    pub prune_missing: bool,
}

impl PlatformConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            inverted: false,
            timeout: Duration::from_secs(30),
            prune_missing: false,
        }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_inverted(self.inverted)
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default().with_timeout(self.timeout)
    }

    /// Build the hub client this configuration describes.
    pub fn hub_client(&self) -> Result<HubClient, CoreError> {
        HubClient::new(self.url.clone(), &self.transport()).map_err(|e| CoreError::Config {
            message: format!("cannot build HTTP client: {e}"),
        })
    }
}
