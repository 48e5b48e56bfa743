// ── Runtime connection configuration ──
//
// Describes *how* to reach a base station. Carries credentials and
// connection tuning but never touches disk: the CLI builds a
// `DeviceConfig` and hands it in.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use solidcom_api::TransportConfig;
use solidcom_api::transport::{DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT};

use crate::error::CoreError;

/// Poll period used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Longest accepted poll period.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(60_000);

/// Configuration for talking to a single base station.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// IP address or hostname, optionally with a port.
    pub host: String,
    pub username: String,
    pub password: SecretString,
    /// Background refresh period. Zero disables polling.
    pub poll_interval: Duration,
    /// HTTP proxy all device requests go through.
    pub proxy: Option<Url>,
    /// Bound for login and reads.
    pub read_timeout: Duration,
    /// Bound for pushes.
    pub write_timeout: Duration,
    /// Overrides the default `solidcom/<version>` user agent.
    pub user_agent: Option<String>,
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password,
            poll_interval: DEFAULT_POLL_INTERVAL,
            proxy: None,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            user_agent: None,
        }
    }

    /// Check that the device can be contacted with these settings.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device IP address is required".into(),
            });
        }
        if self.username.trim().is_empty() || self.password.expose_secret().is_empty() {
            return Err(CoreError::Config {
                message: "username and password are required".into(),
            });
        }
        if self.poll_interval > MAX_POLL_INTERVAL {
            return Err(CoreError::Config {
                message: format!(
                    "poll interval {}ms exceeds the {}ms maximum",
                    self.poll_interval.as_millis(),
                    MAX_POLL_INTERVAL.as_millis()
                ),
            });
        }
        if self.read_timeout.is_zero() || self.write_timeout.is_zero() {
            return Err(CoreError::Config {
                message: "request timeouts must be non-zero".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let mut transport =
            TransportConfig::default().with_timeouts(self.read_timeout, self.write_timeout);
        if let Some(ref proxy) = self.proxy {
            transport = transport.with_proxy(proxy.clone());
        }
        if let Some(ref agent) = self.user_agent {
            transport.user_agent.clone_from(agent);
        }
        transport
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> DeviceConfig {
        DeviceConfig::new("192.168.218.10", "admin", SecretString::from("12345678".to_owned()))
    }

    #[test]
    fn defaults_match_device_limits() {
        let cfg = config();
        assert_eq!(cfg.poll_interval, Duration::from_millis(5000));
        assert_eq!(cfg.read_timeout, Duration::from_secs(10));
        assert_eq!(cfg.write_timeout, Duration::from_secs(5));
        cfg.validate().unwrap();
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let mut cfg = config();
        cfg.host = String::new();
        assert!(matches!(cfg.validate(), Err(CoreError::Config { .. })));

        let mut cfg = config();
        cfg.password = SecretString::from(String::new());
        assert!(matches!(cfg.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn validate_bounds_poll_interval() {
        let mut cfg = config();
        cfg.poll_interval = Duration::ZERO;
        cfg.validate().unwrap();
        cfg.poll_interval = Duration::from_millis(60_001);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn transport_carries_proxy_and_timeouts() {
        let mut cfg = config();
        cfg.proxy = Some(Url::parse("http://proxy.local:3128").unwrap());
        cfg.write_timeout = Duration::from_secs(2);
        let transport = cfg.transport();
        assert_eq!(transport.write_timeout, Duration::from_secs(2));
        assert_eq!(transport.proxy.unwrap().host_str(), Some("proxy.local"));
    }
}
