//! State synchronization and mutation serialization for Solidcom base
//! stations, sitting between `solidcom-api` and a host (the CLI, or any
//! button-automation surface).
//!
//! - **[`Controller`]**: central facade. [`connect()`](Controller::connect)
//!   logs in, fetches an initial snapshot, then spawns the command processor
//!   and the poller. [`Controller::oneshot()`] runs a single closure against
//!   a fresh connection for CLI use.
//!
//! - **[`DataStore`]**: lock-free cache of the last fetched pack tree and
//!   role catalog (`arc-swap` snapshots plus `tokio::sync::watch` fan-out).
//!   Reads never touch the network.
//!
//! - **[`Command`]**: typed mutations routed through an `mpsc` channel to a
//!   single worker, so every read-modify-write against the device completes
//!   before the next starts.
//!
//! - **[`StatusPublisher`]**: the connection state machine hosts observe.
//!
//! - Pure derivations of cached state: [`variables`], [`feedback`] colors
//!   and option [`choices`].

pub mod choices;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod model;
mod poller;
pub mod status;
pub mod store;
pub mod variables;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use config::{DEFAULT_POLL_INTERVAL, DeviceConfig, MAX_POLL_INTERVAL};
pub use controller::Controller;
pub use error::CoreError;
pub use feedback::{ButtonStyle, FeedbackInvalidation, Rgb};
pub use status::{DeviceStatus, StatusPublisher, status_for};
pub use store::{DataStore, PackSnapshot};
pub use variables::{VariableDefinition, VariableSet, VariableValue};

pub use model::{
    BaseStation, BusLabel, ChannelTarget, Headset, HeadsetSelector, PackInfo, Role, RoleRef,
    TalkMode,
};
