//! Shared configuration for Solidcom tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `solidcom_core::DeviceConfig`. The CLI layers its
//! flag overrides on top of this.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use solidcom_core::{DeviceConfig, MAX_POLL_INTERVAL};

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "solidcom";

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "SOLIDCOM_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named base-station profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Resolve which profile to use: explicit name, then `default_profile`,
    /// then `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Poll period in milliseconds; 0 disables polling.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    #[serde(default = "default_write_timeout_secs")]
    pub write_timeout_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            poll_interval_ms: default_poll_interval_ms(),
            read_timeout_secs: default_read_timeout_secs(),
            write_timeout_secs: default_write_timeout_secs(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_poll_interval_ms() -> u64 {
    5000
}
fn default_read_timeout_secs() -> u64 {
    10
}
fn default_write_timeout_secs() -> u64 {
    5
}

/// A named base-station profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Base station IP address or hostname (e.g. "192.168.218.10").
    pub host: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Override the default poll period.
    pub poll_interval_ms: Option<u64>,

    /// HTTP proxy URL applied to every device request.
    pub proxy: Option<String>,

    pub read_timeout_secs: Option<u64>,
    pub write_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

fn default_username() -> String {
    "admin".into()
}

impl Profile {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            username: default_username(),
            password: None,
            password_env: None,
            poll_interval_ms: None,
            proxy: None,
            read_timeout_secs: None,
            write_timeout_secs: None,
            user_agent: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `SOLIDCOM_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "solidcom", "solidcom").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("solidcom");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
///
/// Environment variables use the `SOLIDCOM_` prefix with `__` between
/// nesting levels, e.g. `SOLIDCOM_DEFAULTS__POLL_INTERVAL_MS=1000`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SOLIDCOM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or fails
/// to parse.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the device password from the credential chain:
/// `password_env` variable, then the system keyring, then plaintext.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
}

// ── Translation to DeviceConfig ─────────────────────────────────────

/// Check a poll period against the accepted range (0 disables polling).
pub fn poll_interval(ms: u64) -> Result<Duration, ConfigError> {
    let interval = Duration::from_millis(ms);
    if interval > MAX_POLL_INTERVAL {
        return Err(ConfigError::Validation {
            field: "poll_interval_ms".into(),
            reason: format!(
                "{ms} is above the {}ms maximum",
                MAX_POLL_INTERVAL.as_millis()
            ),
        });
    }
    Ok(interval)
}

pub fn parse_proxy(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: "proxy".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `DeviceConfig` from a profile and the global defaults,
/// resolving the password through the credential chain.
pub fn profile_to_device_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DeviceConfig, ConfigError> {
    validate_host(profile)?;
    let password = resolve_password(profile, profile_name)?;
    profile_to_device_config_with(profile, defaults, password)
}

/// Like [`profile_to_device_config`] with an already-resolved password.
pub fn profile_to_device_config_with(
    profile: &Profile,
    defaults: &Defaults,
    password: SecretString,
) -> Result<DeviceConfig, ConfigError> {
    validate_host(profile)?;
    let mut config = DeviceConfig::new(profile.host.trim(), profile.username.clone(), password);
    config.poll_interval =
        poll_interval(profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms))?;
    config.proxy = profile.proxy.as_deref().map(parse_proxy).transpose()?;
    config.read_timeout = Duration::from_secs(
        profile
            .read_timeout_secs
            .unwrap_or(defaults.read_timeout_secs),
    );
    config.write_timeout = Duration::from_secs(
        profile
            .write_timeout_secs
            .unwrap_or(defaults.write_timeout_secs),
    );
    config.user_agent.clone_from(&profile.user_agent);
    Ok(config)
}

fn validate_host(profile: &Profile) -> Result<(), ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
        default_profile = "studio"

        [defaults]
        poll_interval_ms = 2000

        [profiles.studio]
        host = "192.168.218.10"
        password = "12345678"

        [profiles.truck]
        host = "10.0.0.5"
        username = "operator"
        password_env = "TRUCK_PW"
        poll_interval_ms = 0
        proxy = "http://proxy.local:3128"
    "#;

    #[test]
    fn loads_profiles_and_defaults_from_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();

            assert_eq!(cfg.active_profile_name(None), "studio");
            assert_eq!(cfg.active_profile_name(Some("truck")), "truck");
            assert_eq!(cfg.defaults.poll_interval_ms, 2000);
            assert_eq!(cfg.defaults.output, "table");
            assert_eq!(cfg.profile("studio").unwrap().username, "admin");
            assert!(matches!(
                cfg.profile("nope"),
                Err(ConfigError::UnknownProfile { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("SOLIDCOM_DEFAULTS__POLL_INTERVAL_MS", "750");
            jail.set_env("SOLIDCOM_DEFAULT_PROFILE", "truck");

            let cfg = load_config_from(Path::new("config.toml")).unwrap();
            assert_eq!(cfg.defaults.poll_interval_ms, 750);
            assert_eq!(cfg.default_profile.as_deref(), Some("truck"));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_| {
            let cfg = load_config_from(Path::new("absent.toml")).unwrap();
            assert!(cfg.profiles.is_empty());
            assert_eq!(cfg.defaults.read_timeout_secs, 10);
            assert_eq!(cfg.defaults.write_timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn password_env_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("SOLIDCOM_TEST_PW", "from-env");
            let mut profile = Profile::new("10.0.0.5");
            profile.password = Some("from-file".into());
            profile.password_env = Some("SOLIDCOM_TEST_PW".into());

            let pw = resolve_password(&profile, "solidcom-config-test").unwrap();
            assert_eq!(pw.expose_secret(), "from-env");
            Ok(())
        });
    }

    #[test]
    fn missing_password_is_no_credentials() {
        let profile = Profile::new("10.0.0.5");
        assert!(matches!(
            resolve_password(&profile, "solidcom-config-test-missing"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn profile_translates_to_device_config() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("TRUCK_PW", "hunter2");
            let cfg = load_config_from(Path::new("config.toml")).unwrap();

            let studio =
                profile_to_device_config(cfg.profile("studio").unwrap(), "studio", &cfg.defaults)
                    .unwrap();
            assert_eq!(studio.host, "192.168.218.10");
            assert_eq!(studio.poll_interval, Duration::from_millis(2000));
            assert_eq!(studio.read_timeout, Duration::from_secs(10));
            assert!(studio.proxy.is_none());

            let truck =
                profile_to_device_config(cfg.profile("truck").unwrap(), "truck", &cfg.defaults)
                    .unwrap();
            assert_eq!(truck.username, "operator");
            assert_eq!(truck.password.expose_secret(), "hunter2");
            assert!(truck.poll_interval.is_zero());
            assert_eq!(truck.proxy.unwrap().host_str(), Some("proxy.local"));
            Ok(())
        });
    }

    #[test]
    fn rejects_out_of_range_poll_interval_and_bad_proxy() {
        assert!(poll_interval(60_000).is_ok());
        assert!(matches!(
            poll_interval(60_001),
            Err(ConfigError::Validation { .. })
        ));

        let mut profile = Profile::new("10.0.0.5");
        profile.password = Some("pw".into());
        profile.proxy = Some("not a url".into());
        assert!(matches!(
            profile_to_device_config(&profile, "p", &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));

        profile.proxy = None;
        profile.host = "  ".into();
        assert!(matches!(
            profile_to_device_config(&profile, "p", &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        let mut profile = Profile::new("192.168.218.10");
        profile.poll_interval_ms = Some(1000);
        cfg.profiles.insert("default".into(), profile);
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let profile = loaded.profile("default").unwrap();
        assert_eq!(profile.host, "192.168.218.10");
        assert_eq!(profile.poll_interval_ms, Some(1000));
    }
}
