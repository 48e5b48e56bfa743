// Pack info endpoints
//
// Read and replace the base station / headset tree.

use tracing::debug;

use crate::client::{DeviceClient, preview};
use crate::error::Error;
use crate::models::PackInfo;

impl DeviceClient {
    /// Fetch every base station with its headsets.
    ///
    /// `GET /action/getAllPpInfo`
    ///
    /// Fixed interface entries (four-wire and USB audio ports) are split
    /// off the headset lists; see [`BaseStation`](crate::models::BaseStation).
    pub async fn fetch_pack_info(&self) -> Result<PackInfo, Error> {
        let body = self.get_text("getAllPpInfo").await?;
        let pack: PackInfo = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;
        debug!(
            base_stations = pack.base_stations.len(),
            headsets = pack.primary().map_or(0, |bs| bs.headsets.len()),
            "fetched pack info"
        );
        Ok(pack)
    }

    /// Replace the device's base station / headset tree.
    ///
    /// `POST /action/setPpInfo`
    ///
    /// The device replaces the whole document, so `pack` must be complete:
    /// normally a fetched tree with the intended change applied.
    pub async fn push_pack_info(&self, pack: &PackInfo) -> Result<(), Error> {
        debug!("sending setPpInfo");
        self.post_json("setPpInfo", pack).await
    }
}
