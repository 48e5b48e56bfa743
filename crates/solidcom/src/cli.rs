//! Clap derive structures for the `solidcom` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use solidcom_core::{BusLabel, ChannelTarget, TalkMode};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// solidcom -- control a Solidcom intercom base station
#[derive(Debug, Parser)]
#[command(
    name = "solidcom",
    version,
    about = "Monitor and configure Solidcom intercom base stations",
    long_about = "Reads headset, role and channel state from a Hollyland Solidcom\n\
        base station over its HTTP API, and applies headset changes one at a\n\
        time so concurrent edits never overwrite each other.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "SOLIDCOM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Base station IP address or hostname (overrides profile)
    #[arg(long, short = 'H', env = "SOLIDCOM_HOST", global = true)]
    pub host: Option<String>,

    /// Login username (overrides profile)
    #[arg(long, short = 'u', env = "SOLIDCOM_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "SOLIDCOM_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Poll period in milliseconds for `watch` (0 disables polling)
    #[arg(long, env = "SOLIDCOM_POLL_INTERVAL", global = true)]
    pub poll_interval: Option<u64>,

    /// HTTP proxy for device requests
    #[arg(long, env = "SOLIDCOM_PROXY", global = true)]
    pub proxy: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SOLIDCOM_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show connection status and base station summary
    #[command(alias = "st")]
    Status,

    /// List headsets with their role, channels and signal
    #[command(alias = "hs")]
    Headsets,

    /// List the role catalog
    Roles,

    /// Print the derived variables
    #[command(alias = "vars")]
    Variables,

    /// Rename a headset
    Rename(RenameArgs),

    /// Move a bus (A or B) to a channel slot on a headset
    #[command(alias = "ch")]
    Channel(ChannelArgs),

    /// Assign a role from the catalog to a headset
    Role(RoleArgs),

    /// Set a headset's talk mode
    TalkMode(TalkModeArgs),

    /// Poll the device and print status and variable changes
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Mutation Arguments ───────────────────────────────────────────────

/// How to find the target headset.
#[derive(Debug, Args)]
pub struct HeadsetArg {
    /// Headset name, or numeric ID with --by-id
    pub headset: String,

    /// Treat HEADSET as a numeric ID
    #[arg(long)]
    pub by_id: bool,
}

#[derive(Debug, Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub target: HeadsetArg,

    /// New headset name
    pub name: String,
}

#[derive(Debug, Args)]
pub struct ChannelArgs {
    #[command(flatten)]
    pub target: HeadsetArg,

    /// Bus label (A or B)
    #[arg(value_parser = parse_bus)]
    pub bus: BusLabel,

    /// Channel slot 1-6, or "none" to unassign
    #[arg(value_parser = parse_channel)]
    pub channel: ChannelTarget,
}

#[derive(Debug, Args)]
pub struct RoleArgs {
    #[command(flatten)]
    pub target: HeadsetArg,

    /// Role name as listed by `solidcom roles`
    pub role: String,

    /// Make the headset the role's head
    #[arg(long)]
    pub head: bool,
}

#[derive(Debug, Args)]
pub struct TalkModeArgs {
    #[command(flatten)]
    pub target: HeadsetArg,

    /// ptt-force-listen (ptt), talk-listen, or talk-force-listen
    #[arg(value_parser = parse_talk_mode)]
    pub mode: TalkMode,
}

fn parse_bus(raw: &str) -> Result<BusLabel, String> {
    raw.parse()
        .map_err(|_| format!("expected A or B, got '{raw}'"))
}

fn parse_channel(raw: &str) -> Result<ChannelTarget, String> {
    raw.parse().map_err(|e: solidcom_core::CoreError| e.to_string())
}

fn parse_talk_mode(raw: &str) -> Result<TalkMode, String> {
    raw.parse().map_err(|_| {
        format!("expected ptt-force-listen, talk-listen or talk-force-listen, got '{raw}'")
    })
}

// ── Watch ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Also print variables whose value did not change
    #[arg(long)]
    pub all: bool,

    /// Exit after this many snapshot updates
    #[arg(long)]
    pub count: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (passwords redacted)
    Show,

    /// List configured profiles
    Profiles,

    /// Add or replace a profile
    Add {
        /// Profile name
        name: String,

        /// Base station IP address or hostname
        #[arg(long)]
        device_host: String,

        /// Login username
        #[arg(long, default_value = "admin")]
        device_username: String,

        /// Environment variable holding the password
        #[arg(long)]
        password_env: Option<String>,

        /// Poll period in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring (read from stdin)
    SetPassword {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
