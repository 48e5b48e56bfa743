//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod config_cmd;
pub mod headsets;
pub mod mutate;
pub mod roles;
pub mod status;
pub mod util;
pub mod variables;
pub mod watch;

use solidcom_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(controller, global).await,
        Command::Headsets => headsets::handle(controller, global).await,
        Command::Roles => roles::handle(controller, global).await,
        Command::Variables => variables::handle(controller, global).await,
        Command::Rename(args) => mutate::rename(controller, args, global).await,
        Command::Channel(args) => mutate::channel(controller, args, global).await,
        Command::Role(args) => mutate::role(controller, args, global).await,
        Command::TalkMode(args) => mutate::talk_mode(controller, args, global).await,
        Command::Watch(args) => watch::handle(controller, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
