// Hub device endpoints
//
// Discovery via the v4 device list, live state via the v4 detail view,
// and movement via the legacy command endpoint.

use tracing::debug;

use crate::client::HubClient;
use crate::error::Error;
use crate::models::{
    DeviceDescriptor, DeviceDetail, DeviceDetailResponse, DeviceListResponse, MoveCommand,
};

impl HubClient {
    /// List every actuator the hub knows about.
    ///
    /// Entries that fail to decode are skipped; the call fails only when
    /// the body carries no device list.
    ///
    /// `GET /v4/devices?devtype=Actuator`
    pub async fn list_actuators(&self) -> Result<Vec<DeviceDescriptor>, Error> {
        let mut url = self.url("v4/devices")?;
        url.query_pairs_mut().append_pair("devtype", "Actuator");
        debug!("listing actuators");
        let body: DeviceListResponse = self.get(url).await?;
        body.into_descriptors().ok_or(Error::MissingDeviceList)
    }

    /// Fetch the live state of one device.
    ///
    /// `GET /v4/devices/{did}`
    pub async fn get_device(&self, did: &str) -> Result<DeviceDetail, Error> {
        let url = self.url(&format!("v4/devices/{did}"))?;
        let body: DeviceDetailResponse = self.get(url).await?;
        Ok(body.device)
    }

    /// Drive a device to an absolute position in raw hub orientation.
    ///
    /// `PUT /devices/{did}` with `{"name": "GOTO_POS_CMD", "value": ...}`
    pub async fn goto_position(&self, did: &str, value: u8) -> Result<(), Error> {
        let url = self.url(&format!("devices/{did}"))?;
        debug!(did, value, "sending move command");
        self.put(url, &MoveCommand::goto(value)).await
    }
}
