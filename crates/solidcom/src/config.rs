//! CLI configuration: thin wrapper around `solidcom_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--host, --username, --password, --poll-interval, --proxy).

use secrecy::SecretString;

use solidcom_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use solidcom_config::{
    Config, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a `DeviceConfig` from the config file, profile, and CLI overrides.
///
/// Without a matching profile, `--host` plus a password are enough.
pub fn build_device_config(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        None => {
            let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile::new(host)
        }
    };

    apply_overrides(&mut profile, global);

    let config = match global.password {
        Some(ref pw) => solidcom_config::profile_to_device_config_with(
            &profile,
            &cfg.defaults,
            SecretString::from(pw.clone()),
        )?,
        None => solidcom_config::profile_to_device_config(&profile, &profile_name, &cfg.defaults)?,
    };
    Ok(config)
}

fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username.clone_from(username);
    }
    if let Some(ms) = global.poll_interval {
        profile.poll_interval_ms = Some(ms);
    }
    if let Some(ref proxy) = global.proxy {
        profile.proxy = Some(proxy.clone());
    }
}
