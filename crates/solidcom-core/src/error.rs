// ── Core error types ──
//
// User-facing errors from solidcom-core. The `From<solidcom_api::Error>`
// impl translates transport-layer errors into domain variants, so
// consumers never match on reqwest or serde failures directly.

use std::time::Duration;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in to the device")]
    Unauthenticated,

    #[error("Session rejected by device -- reconnect required")]
    SessionExpired,

    // ── Connection errors ────────────────────────────────────────────
    #[error("Device request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Cannot reach device: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Device rejected request (HTTP {status}): {message}")]
    DeviceRejected { status: u16, message: String },

    #[error("Controller disconnected")]
    ControllerDisconnected,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Unexpected device response: {message}")]
    Parse { message: String },

    #[error("Headset not found: {identifier}")]
    HeadsetNotFound { identifier: String },

    #[error("Role not found: {name}")]
    RoleNotFound { name: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Lookup misses against the device tree or role catalog.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::HeadsetNotFound { .. } | Self::RoleNotFound { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<solidcom_api::Error> for CoreError {
    fn from(err: solidcom_api::Error) -> Self {
        match err {
            solidcom_api::Error::Config { message } => CoreError::Config { message },
            solidcom_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            solidcom_api::Error::Unauthenticated => CoreError::Unauthenticated,
            solidcom_api::Error::SessionExpired => CoreError::SessionExpired,
            solidcom_api::Error::Timeout { timeout } => CoreError::Timeout { timeout },
            // Timeouts are classified with their configured bound before
            // they reach here.
            solidcom_api::Error::Transport(e) => CoreError::ConnectionFailed {
                reason: e.to_string(),
            },
            solidcom_api::Error::Http { status, body } => CoreError::DeviceRejected {
                status,
                message: body,
            },
            solidcom_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device address: {e}"),
            },
            solidcom_api::Error::Proxy(message) => CoreError::Config { message },
            solidcom_api::Error::Deserialization { message, body: _ } => {
                CoreError::Parse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_domain_variants() {
        let err: CoreError = solidcom_api::Error::Http {
            status: 500,
            body: "busy".into(),
        }
        .into();
        assert!(matches!(err, CoreError::DeviceRejected { status: 500, .. }));

        let err: CoreError = solidcom_api::Error::SessionExpired.into();
        assert!(matches!(err, CoreError::SessionExpired));

        let err: CoreError = solidcom_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Parse { .. }));

        let err: CoreError = solidcom_api::Error::Timeout {
            timeout: Duration::from_millis(500),
        }
        .into();
        assert!(matches!(err, CoreError::Timeout { timeout } if timeout == Duration::from_millis(500)));
        assert_eq!(err.to_string(), "Device request timed out after 500ms");
    }

    #[test]
    fn lookup_misses_are_not_found() {
        assert!(
            CoreError::RoleNotFound {
                name: "Grip".into()
            }
            .is_not_found()
        );
        assert!(!CoreError::ControllerDisconnected.is_not_found());
    }
}
