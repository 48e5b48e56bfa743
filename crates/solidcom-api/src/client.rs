// Device HTTP client
//
// Wraps `reqwest::Client` with device URL construction, session cookie
// injection, per-request timeouts and status mapping. The endpoint
// operations live in separate files as inherent methods (auth.rs, pack.rs,
// roles.rs) to keep this module focused on transport mechanics.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::COOKIE;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Session credential issued by the device at login.
///
/// Holds the `Set-Cookie` value exactly as received. It is replayed as the
/// `Cookie` header and never parsed.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }

    pub(crate) fn header_value(&self) -> &str {
        self.token.expose_secret()
    }
}

/// Raw HTTP client for the base station's `/action/*` API.
///
/// Owns the session: [`login`](Self::login) stores it, every other request
/// replays it, and a rejection from the device drops it. No request is ever
/// retried.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    read_timeout: Duration,
    write_timeout: Duration,
    session: RwLock<Option<Session>>,
}

impl DeviceClient {
    /// Create a client for the device at `host`.
    ///
    /// `host` is an IP address or hostname (optionally with port). A full
    /// `http://` URL is accepted too. Fails with [`Error::Config`] when empty.
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = device_url(host)?;
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            base_url,
            transport.read_timeout,
            transport.write_timeout,
        ))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            read_timeout,
            write_timeout,
            session: RwLock::new(None),
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    // ── Session management ───────────────────────────────────────────

    /// Whether a session is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn set_session(&self, session: Session) {
        debug!("storing session credential");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Drop the held session. The next device operation fails with
    /// [`Error::Unauthenticated`] until [`login`](Self::login) succeeds again.
    pub fn clear_session(&self) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn session_header(&self) -> Result<String, Error> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.header_value().to_owned())
            .ok_or(Error::Unauthenticated)
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/action/{name}`.
    pub(crate) fn action_url(&self, name: &str) -> Result<Url, Error> {
        self.base_url
            .join(&format!("action/{name}"))
            .map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET bounded by the read timeout and return the body.
    pub(crate) async fn get_text(&self, action: &str) -> Result<String, Error> {
        let cookie = self.session_header()?;
        let url = self.action_url(action)?;
        debug!("GET {}", url);

        let timeout = self.read_timeout;
        let resp = self
            .http
            .get(url)
            .header(COOKIE, cookie)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, timeout))?;

        let resp = self.check_status(resp).await?;
        resp.text().await.map_err(|e| map_send_error(e, timeout))
    }

    /// Send an authenticated JSON POST bounded by the write timeout.
    pub(crate) async fn post_json(
        &self,
        action: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        let cookie = self.session_header()?;
        let url = self.action_url(action)?;
        debug!("POST {}", url);

        let timeout = self.write_timeout;
        let resp = self
            .http
            .post(url)
            .header(COOKIE, cookie)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, timeout))?;

        let resp = self.check_status(resp).await?;
        trace!(status = %resp.status(), "write accepted");
        Ok(())
    }

    /// Map rejected sessions and non-success statuses to errors.
    ///
    /// 401, 403 and redirects (the device sends unauthenticated callers
    /// to its login page) drop the held session.
    async fn check_status(&self, resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        debug!("response status: {status}");

        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || status.is_redirection()
        {
            self.clear_session();
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        Ok(resp)
    }
}

/// Turn a configured host into the device base URL (`http://{host}/`).
pub fn device_url(host: &str) -> Result<Url, Error> {
    let host = host.trim();
    if host.is_empty() {
        return Err(Error::Config {
            message: "device IP address is required".into(),
        });
    }
    let raw = if host.contains("://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    };
    let mut url = Url::parse(&raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Classify a reqwest failure, keeping timeouts distinct from other
/// transport errors.
pub(crate) fn map_send_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout { timeout }
    } else {
        Error::Transport(err)
    }
}

pub(crate) fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn device_url_accepts_bare_host() {
        let url = device_url("192.168.218.10").unwrap();
        assert_eq!(url.as_str(), "http://192.168.218.10/");
    }

    #[test]
    fn device_url_keeps_explicit_scheme_and_port() {
        let url = device_url("http://10.0.0.5:8080").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5:8080/");
    }

    #[test]
    fn device_url_rejects_empty_host() {
        assert!(matches!(device_url("  "), Err(Error::Config { .. })));
    }

    #[test]
    fn action_url_joins_under_base() {
        let client = DeviceClient::with_client(
            reqwest::Client::new(),
            device_url("10.0.0.5").unwrap(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        );
        let url = client.action_url("getAllPpInfo").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5/action/getAllPpInfo");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        assert_eq!(preview(&long).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }
}
