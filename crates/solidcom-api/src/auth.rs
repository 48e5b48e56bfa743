// Session login
//
// Form-encoded username/password login. The device answers with a session
// cookie that is kept verbatim and replayed on every later request.

use reqwest::header::{ACCEPT, CACHE_CONTROL, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use crate::client::{DeviceClient, Session, map_send_error, preview};
use crate::error::Error;

impl DeviceClient {
    /// Authenticate with the device using username/password.
    ///
    /// `POST /action/login` (form: `username`, `password`)
    ///
    /// Fails with [`Error::Config`] before any request when either
    /// credential is empty. On success the session credential is stored
    /// and used for all subsequent requests. A timeout is reported as
    /// [`Error::Timeout`] so callers can tell an unreachable device from
    /// rejected credentials. Not retried.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        if username.trim().is_empty() || password.expose_secret().is_empty() {
            return Err(Error::Config {
                message: "username and password are required".into(),
            });
        }

        let url = self.action_url("login")?;
        debug!("sending login request to {}", url);

        let timeout = self.read_timeout();
        let form = [("username", username), ("password", password.expose_secret())];
        let resp = self
            .http()
            .post(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(ACCEPT, "*/*")
            .form(&form)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        let cookies: Vec<&str> = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        if cookies.is_empty() {
            return Err(Error::Authentication {
                message: "login response carried no session cookie".into(),
            });
        }

        self.set_session(Session::new(cookies.join("; ")));
        info!("login successful");
        Ok(())
    }

    /// Forget the current session. The device has no logout endpoint.
    pub fn logout(&self) {
        self.clear_session();
        debug!("session dropped");
    }
}
