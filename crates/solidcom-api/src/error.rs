use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `solidcom-api` crate.
///
/// Covers every failure mode of the device HTTP surface: configuration,
/// session handling, transport, HTTP status and response parsing.
/// `solidcom-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Missing or invalid connection settings. Never retried.
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected by the device.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// A device operation was attempted before a successful login.
    #[error("No session held -- login required")]
    Unauthenticated,

    /// The device rejected the held session. The session has been dropped.
    #[error("Session rejected by device -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// The request did not complete within its timeout.
    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The device answered with an unexpected HTTP status.
    #[error("Device returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured proxy could not be applied.
    #[error("Invalid proxy: {0}")]
    Proxy(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the held session is gone and a new login
    /// is needed before further requests can succeed.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthenticated)
    }

    /// Returns `true` for request-level failures: timeouts, transport
    /// errors and unexpected HTTP statuses.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Transport(_) | Self::Http { .. }
        )
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}
