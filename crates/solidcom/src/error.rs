//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use solidcom_config::ConfigError;
use solidcom_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the base station: {reason}")]
    #[diagnostic(
        code(solidcom::connection_failed),
        help(
            "Check that the base station is powered and reachable on the network.\n\
             Try: solidcom status --host <ip-address>"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Base station rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(solidcom::device_rejected))]
    DeviceRejected { status: u16, message: String },

    #[error("The base station ended the session")]
    #[diagnostic(
        code(solidcom::session_expired),
        help("Run the command again to log in with a fresh session.")
    )]
    SessionExpired,

    #[error("Unexpected response from the base station: {message}")]
    #[diagnostic(
        code(solidcom::parse),
        help("The firmware may use a format this tool does not understand. Re-run with -vv for details.")
    )]
    Parse { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(solidcom::auth_failed),
        help(
            "Verify the username and password set on the base station.\n\
             Store a password with: solidcom config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(solidcom::no_credentials),
        help(
            "Pass --password, set SOLIDCOM_PASSWORD, or store one with:\n\
             solidcom config set-password {profile}"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(solidcom::not_found),
        help("Run: solidcom {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(solidcom::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(solidcom::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: solidcom config add <name> --device-host <ip-address>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No base station configured")]
    #[diagnostic(
        code(solidcom::no_config),
        help(
            "Pass --host, or create a profile with:\n\
             solidcom config add default --device-host <ip-address>\n\
             Config file: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(solidcom::config))]
    Config(Box<ConfigError>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {timeout:?}")]
    #[diagnostic(
        code(solidcom::timeout),
        help("Check the network path to the base station.")
    )]
    Timeout { timeout: Duration },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(solidcom::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. }
            | Self::DeviceRejected { .. }
            | Self::SessionExpired
            | Self::Parse { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            Self::Config(_) | Self::Internal(_) | Self::Io(_) | Self::Json(_) | Self::Toml(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config { message } => CliError::Validation {
                field: "device config".into(),
                reason: message,
            },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Unauthenticated | CoreError::SessionExpired => CliError::SessionExpired,
            CoreError::Timeout { timeout } => CliError::Timeout { timeout },
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::DeviceRejected { status, message } => {
                CliError::DeviceRejected { status, message }
            }
            CoreError::ControllerDisconnected => CliError::ConnectionFailed {
                reason: "connection was closed".into(),
            },
            CoreError::Parse { message } => CliError::Parse { message },
            CoreError::HeadsetNotFound { identifier } => CliError::NotFound {
                resource_type: "headset".into(),
                identifier,
                list_command: "headsets".into(),
            },
            CoreError::RoleNotFound { name } => CliError::NotFound {
                resource_type: "role".into(),
                identifier: name,
                list_command: "roles".into(),
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::AuthenticationFailed {
                    message: "401".into(),
                },
                exit_code::AUTH,
            ),
            (
                CoreError::Timeout {
                    timeout: Duration::from_secs(10),
                },
                exit_code::TIMEOUT,
            ),
            (
                CoreError::HeadsetNotFound {
                    identifier: "id 9".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::RoleNotFound {
                    name: "Grip".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::DeviceRejected {
                    status: 500,
                    message: "busy".into(),
                },
                exit_code::CONNECTION,
            ),
            (
                CoreError::ValidationFailed {
                    message: "empty".into(),
                },
                exit_code::USAGE,
            ),
        ];
        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn missing_password_maps_to_auth_exit() {
        let err = CliError::from(ConfigError::NoCredentials {
            profile: "studio".into(),
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(err.to_string().contains("studio"));
    }
}
