// ── Command API ──
//
// All writes flow through a unified `Command` enum. The controller's
// command processor drains them one at a time, so each read-modify-write
// cycle against the device completes before the next begins.

pub mod transform;

use crate::error::CoreError;
use crate::model::{BusLabel, ChannelTarget, HeadsetSelector, TalkMode};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All write operations against a base station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RenameHeadset {
        headset: HeadsetSelector,
        name: String,
    },
    SetHeadsetChannel {
        headset: HeadsetSelector,
        bus: BusLabel,
        target: ChannelTarget,
    },
    SetHeadsetRole {
        headset: HeadsetSelector,
        role: String,
        head: bool,
    },
    SetHeadsetTalkMode {
        headset: HeadsetSelector,
        mode: TalkMode,
    },
}

impl Command {
    pub fn headset(&self) -> &HeadsetSelector {
        match self {
            Self::RenameHeadset { headset, .. }
            | Self::SetHeadsetChannel { headset, .. }
            | Self::SetHeadsetRole { headset, .. }
            | Self::SetHeadsetTalkMode { headset, .. } => headset,
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RenameHeadset { .. } => "rename",
            Self::SetHeadsetChannel { .. } => "set-channel",
            Self::SetHeadsetRole { .. } => "set-role",
            Self::SetHeadsetTalkMode { .. } => "set-talk-mode",
        }
    }
}

/// Outcome of a committed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Ok { headset_id: u32 },
    /// The pack push landed but a follow-up write did not.
    PartialSuccess { headset_id: u32, warning: String },
}

impl CommandResult {
    pub fn headset_id(&self) -> u32 {
        match self {
            Self::Ok { headset_id } | Self::PartialSuccess { headset_id, .. } => *headset_id,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::Ok { .. } => None,
            Self::PartialSuccess { warning, .. } => Some(warning),
        }
    }
}
