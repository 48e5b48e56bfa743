// Role catalog endpoints

use tracing::debug;

use crate::client::{DeviceClient, preview};
use crate::error::Error;
use crate::models::Role;

impl DeviceClient {
    /// Fetch the base station's role catalog.
    ///
    /// `GET /action/getBsRole`
    ///
    /// An empty body means an empty catalog, not an error.
    pub async fn fetch_roles(&self) -> Result<Vec<Role>, Error> {
        let body = self.get_text("getBsRole").await?;
        if body.trim().is_empty() {
            debug!("role catalog body empty");
            return Ok(Vec::new());
        }
        let roles: Vec<Role> = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })?;
        debug!("fetched {} roles from device", roles.len());
        Ok(roles)
    }

    /// Push a single role record.
    ///
    /// `POST /action/setBsRole`
    ///
    /// Callers normally pass [`Role::taking_effect`] so the device applies
    /// the role station-wide immediately.
    pub async fn push_role(&self, role: &Role) -> Result<(), Error> {
        debug!(role = %role.name, "sending setBsRole");
        self.post_json("setBsRole", role).await
    }
}
