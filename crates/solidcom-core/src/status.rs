// ── Device status ──
//
// The connection state the host displays. Changes go through a small
// transition table; anything outside it is dropped so a late failure
// cannot overwrite a fresher state.

use std::fmt;

use tokio::sync::watch;
use tracing::{debug, trace};

use crate::error::CoreError;

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    Connecting,
    Ok,
    AuthFailed { message: String },
    ConnectionFailure { message: String },
    Unknown { message: String },
}

impl DeviceStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Short lowercase name of the state.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Ok => "ok",
            Self::AuthFailed { .. } => "auth_failure",
            Self::ConnectionFailure { .. } => "connection_failure",
            Self::Unknown { .. } => "unknown",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Connecting | Self::Ok => None,
            Self::AuthFailed { message }
            | Self::ConnectionFailure { message }
            | Self::Unknown { message } => Some(message),
        }
    }

    /// Whether moving from `self` to `next` is a legal state change.
    pub fn can_transition_to(&self, next: &DeviceStatus) -> bool {
        use DeviceStatus::{AuthFailed, Connecting, ConnectionFailure, Ok, Unknown};

        matches!(
            (self, next),
            (_, Connecting)
                | (Connecting, Ok | AuthFailed { .. } | ConnectionFailure { .. })
                | (Ok, ConnectionFailure { .. } | Unknown { .. })
                | (
                    ConnectionFailure { .. } | Unknown { .. },
                    Ok | ConnectionFailure { .. } | Unknown { .. },
                )
        )
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}: {message}", self.label()),
            None => f.write_str(self.label()),
        }
    }
}

/// The status a failed operation should leave behind, if any.
///
/// Lookup and validation failures say nothing about the connection
/// and map to `None`.
pub fn status_for(err: &CoreError) -> Option<DeviceStatus> {
    let message = err.to_string();
    match err {
        CoreError::Config { .. } | CoreError::AuthenticationFailed { .. } => {
            Some(DeviceStatus::AuthFailed { message })
        }
        CoreError::Timeout { .. }
        | CoreError::ConnectionFailed { .. }
        | CoreError::DeviceRejected { .. } => Some(DeviceStatus::ConnectionFailure { message }),
        CoreError::Parse { .. } | CoreError::SessionExpired | CoreError::Unauthenticated => {
            Some(DeviceStatus::Unknown { message })
        }
        CoreError::HeadsetNotFound { .. }
        | CoreError::RoleNotFound { .. }
        | CoreError::ValidationFailed { .. }
        | CoreError::ControllerDisconnected
        | CoreError::Internal(_) => None,
    }
}

// ── Publisher ────────────────────────────────────────────────────────

/// Owns the current [`DeviceStatus`] and fans it out over a `watch` channel.
#[derive(Debug)]
pub struct StatusPublisher {
    tx: watch::Sender<DeviceStatus>,
}

impl StatusPublisher {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(DeviceStatus::Unknown {
            message: "not connected".into(),
        });
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<DeviceStatus> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> DeviceStatus {
        self.tx.borrow().clone()
    }

    /// Apply `next` if the transition table allows it.
    ///
    /// Returns `true` when subscribers were notified. Repeating the current
    /// state is a no-op.
    pub fn publish(&self, next: DeviceStatus) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            if !current.can_transition_to(&next) {
                trace!(from = %current, to = %next, "ignoring status transition");
                return false;
            }
            debug!(from = %current, to = %next, "device status changed");
            *current = next;
            true
        })
    }

    /// Publish the status matching `err`. Returns `false` when the error
    /// carries no status or the transition is not allowed.
    pub fn publish_error(&self, err: &CoreError) -> bool {
        status_for(err).is_some_and(|status| self.publish(status))
    }

    /// Set the status unconditionally (used on disconnect).
    pub(crate) fn reset(&self, status: DeviceStatus) {
        self.tx.send_replace(status);
    }
}

impl Default for StatusPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(msg: &str) -> DeviceStatus {
        DeviceStatus::ConnectionFailure {
            message: msg.into(),
        }
    }

    fn unknown(msg: &str) -> DeviceStatus {
        DeviceStatus::Unknown {
            message: msg.into(),
        }
    }

    #[test]
    fn connect_sequence_is_allowed() {
        let status = StatusPublisher::new();
        assert!(status.publish(DeviceStatus::Connecting));
        assert!(status.publish(DeviceStatus::Ok));
        assert!(status.publish(failure("timed out")));
        assert!(status.publish(DeviceStatus::Ok));
        assert!(status.current().is_ok());
    }

    #[test]
    fn auth_failure_only_leaves_via_connecting() {
        let status = StatusPublisher::new();
        status.publish(DeviceStatus::Connecting);
        assert!(status.publish(DeviceStatus::AuthFailed {
            message: "bad password".into()
        }));
        assert!(!status.publish(DeviceStatus::Ok));
        assert!(!status.publish(failure("x")));
        assert_eq!(status.current().label(), "auth_failure");
        assert!(status.publish(DeviceStatus::Connecting));
    }

    #[test]
    fn connecting_cannot_jump_to_unknown() {
        let status = StatusPublisher::new();
        status.publish(DeviceStatus::Connecting);
        assert!(!status.publish(unknown("parse")));
        assert_eq!(status.current(), DeviceStatus::Connecting);
    }

    #[test]
    fn degraded_states_update_messages() {
        let status = StatusPublisher::new();
        status.publish(DeviceStatus::Connecting);
        status.publish(DeviceStatus::Ok);
        assert!(status.publish(unknown("session rejected")));
        assert!(status.publish(failure("refused")));
        assert!(status.publish(failure("timed out")));
        assert_eq!(status.current().message(), Some("timed out"));
        // Same state twice does not notify.
        assert!(!status.publish(failure("timed out")));
    }

    #[test]
    fn errors_map_to_statuses() {
        let s = status_for(&CoreError::Timeout {
            timeout: std::time::Duration::from_secs(10),
        }).map(|s| s.label());
        assert_eq!(s, Some("connection_failure"));
        let s = status_for(&CoreError::SessionExpired).map(|s| s.label());
        assert_eq!(s, Some("unknown"));
        let s = status_for(&CoreError::AuthenticationFailed {
            message: "no".into(),
        })
        .map(|s| s.label());
        assert_eq!(s, Some("auth_failure"));
        assert!(
            status_for(&CoreError::HeadsetNotFound {
                identifier: "7".into()
            })
            .is_none()
        );
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let status = StatusPublisher::new();
        let mut rx = status.subscribe();
        status.publish(DeviceStatus::Connecting);
        rx.changed().await.ok();
        assert_eq!(*rx.borrow_and_update(), DeviceStatus::Connecting);
    }
}
