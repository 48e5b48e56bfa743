// Shared transport configuration for building reqwest::Client instances.
//
// Holds per-request timeouts, the optional HTTP proxy and the user agent.
// Timeouts are applied per request rather than on the client so reads and
// writes can be bounded differently.

use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Default bound for login and read requests.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound for write requests.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_USER_AGENT: &str = concat!("solidcom/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Bound for login, `getAllPpInfo` and `getBsRole`.
    pub read_timeout: Duration,
    /// Bound for `setPpInfo` and `setBsRole`.
    pub write_timeout: Duration,
    /// Optional HTTP proxy all requests are routed through.
    pub proxy: Option<Url>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            proxy: None,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// Redirects are not followed: the device answers an unauthenticated
    /// request on an `/action/` path by redirecting to its login page,
    /// and that has to surface as a rejected session rather than as an
    /// HTML body that fails to parse.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(self.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::none());

        if let Some(ref proxy) = self.proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str())
                .map_err(|e| Error::Proxy(format!("{proxy}: {e}")))?;
            builder = builder.proxy(proxy);
        }

        builder.build().map_err(Error::Transport)
    }

    pub fn with_proxy(mut self, proxy: Url) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_timeouts(mut self, read: Duration, write: Duration) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }
}
