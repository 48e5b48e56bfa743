//! Headset mutation commands: rename, channel, role, talk-mode.
//!
//! Each goes through the controller's command queue, so the device sees
//! one read-modify-write at a time.

use serde::Serialize;

use solidcom_core::{CommandResult, Controller};

use crate::cli::{ChannelArgs, GlobalOpts, RenameArgs, RoleArgs, TalkModeArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct MutationReport {
    action: &'static str,
    headset_id: u32,
    detail: String,
    warning: Option<String>,
}

pub async fn rename(
    controller: &Controller,
    args: RenameArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selector = util::selector(&args.target)?;
    let detail = format!("renamed to \"{}\"", args.name);
    let result = controller.rename_headset(selector, args.name).await?;
    report(global, "rename", detail, &result)
}

pub async fn channel(
    controller: &Controller,
    args: ChannelArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selector = util::selector(&args.target)?;
    let result = controller
        .set_headset_channel(selector, args.bus, args.channel)
        .await?;
    report(
        global,
        "channel",
        format!("bus {} -> {}", args.bus.as_str(), args.channel),
        &result,
    )
}

pub async fn role(
    controller: &Controller,
    args: RoleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selector = util::selector(&args.target)?;
    let detail = if args.head {
        format!("role {} (head)", args.role)
    } else {
        format!("role {}", args.role)
    };
    let result = controller
        .set_headset_role(selector, args.role, args.head)
        .await?;
    report(global, "role", detail, &result)
}

pub async fn talk_mode(
    controller: &Controller,
    args: TalkModeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let selector = util::selector(&args.target)?;
    let result = controller.set_headset_talk_mode(selector, args.mode).await?;
    report(
        global,
        "talk-mode",
        format!("talk mode {}", args.mode.label()),
        &result,
    )
}

fn report(
    global: &GlobalOpts,
    action: &'static str,
    detail: String,
    result: &CommandResult,
) -> Result<(), CliError> {
    let warning = match result {
        CommandResult::Ok { .. } => None,
        CommandResult::PartialSuccess { warning, .. } => Some(warning.clone()),
    };
    let data = MutationReport {
        action,
        headset_id: result.headset_id(),
        detail,
        warning,
    };

    let out = output::render_single(
        global.output,
        &data,
        |r| format!("Headset {}: {}", r.headset_id, r.detail),
        |r| r.headset_id.to_string(),
    )?;
    output::print_output(&out, global.quiet);

    if let Some(ref warning) = data.warning {
        if !global.quiet {
            eprintln!("warning: {warning}");
        }
    }
    Ok(())
}
