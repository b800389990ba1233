// src/config.rs
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::errors::{LaunchError, Result};

pub const TOKEN_VAR: &str = "JAMSOCKET_TOKEN";
pub const ACCOUNT_VAR: &str = "JAMSOCKET_ACCOUNT";
pub const SERVICE_VAR: &str = "JAMSOCKET_SERVICE";
pub const API_BASE_VAR: &str = "JAMSOCKET_API_BASE";
pub const TAG_VAR: &str = "JAMSOCKET_TAG";
pub const POLL_INTERVAL_VAR: &str = "JAMSOCKET_POLL_INTERVAL_MS";
pub const READY_TIMEOUT_VAR: &str = "JAMSOCKET_READY_TIMEOUT_SECS";
pub const SETTINGS_PATH_VAR: &str = "JAMSOCKET_CONFIG";

pub const DEFAULT_API_BASE: &str = "https://api.jamsocket.com";
pub const DEFAULT_TAG: &str = "latest";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Everything the launcher needs for one run. Immutable once loaded.
#[derive(Clone)]
pub struct LaunchConfig {
    pub token: String,
    pub account: String,
    pub service: String,
    pub api_base: String,
    pub tag: String,
    pub poll_interval: Duration,
    /// `None` polls until the backend is ready or a request fails.
    pub ready_timeout: Option<Duration>,
}

impl std::fmt::Debug for LaunchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchConfig")
            .field("token", &"<redacted>")
            .field("account", &self.account)
            .field("service", &self.service)
            .field("api_base", &self.api_base)
            .field("tag", &self.tag)
            .field("poll_interval", &self.poll_interval)
            .field("ready_timeout", &self.ready_timeout)
            .finish()
    }
}

/// Optional non-secret settings read from a TOML file.
///
/// ```toml
/// [launcher]
/// api_base = "https://api.jamsocket.com"
/// tag = "latest"
/// poll_interval_ms = 1000
/// ready_timeout_secs = 300
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub launcher: LauncherSettings,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct LauncherSettings {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    #[serde(default)]
    pub ready_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }
}

impl LaunchConfig {
    /// Load configuration from the process environment, reading the settings
    /// file named by `JAMSOCKET_CONFIG` if one is given.
    pub fn from_env() -> Result<Self> {
        Self::load(|name: &str| std::env::var(name).ok())
    }

    /// Like [`LaunchConfig::from_env`], reading variables through `lookup`.
    pub fn load<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Secrets are validated first so a missing token is reported even when
        // the settings file is also broken.
        required(&lookup, TOKEN_VAR)?;
        required(&lookup, ACCOUNT_VAR)?;
        required(&lookup, SERVICE_VAR)?;

        let settings = match non_empty(&lookup, SETTINGS_PATH_VAR) {
            Some(path) => {
                log::debug!("Reading settings from {}", path);
                Settings::from_file(path)?
            }
            None => Settings::default(),
        };
        Self::from_lookup(lookup, &settings)
    }

    /// Build a configuration from an arbitrary variable lookup layered over
    /// file settings. Variables win over the file; the file wins over defaults.
    pub fn from_lookup<F>(lookup: F, settings: &Settings) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, TOKEN_VAR)?;
        let account = required(&lookup, ACCOUNT_VAR)?;
        let service = required(&lookup, SERVICE_VAR)?;

        let file = &settings.launcher;

        let api_base = non_empty(&lookup, API_BASE_VAR)
            .or_else(|| file.api_base.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let tag = non_empty(&lookup, TAG_VAR)
            .or_else(|| file.tag.clone())
            .unwrap_or_else(|| DEFAULT_TAG.to_string());

        let poll_interval = match parse_u64(&lookup, POLL_INTERVAL_VAR)?.or(file.poll_interval_ms) {
            Some(0) => {
                return Err(LaunchError::Config(format!(
                    "{} must be greater than zero",
                    POLL_INTERVAL_VAR
                )));
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_POLL_INTERVAL,
        };

        let ready_timeout = match parse_u64(&lookup, READY_TIMEOUT_VAR)?.or(file.ready_timeout_secs) {
            Some(0) => {
                return Err(LaunchError::Config(format!(
                    "{} must be greater than zero",
                    READY_TIMEOUT_VAR
                )));
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(LaunchConfig {
            token,
            account,
            service,
            api_base,
            tag,
            poll_interval,
            ready_timeout,
        })
    }
}

fn non_empty<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name).ok_or(LaunchError::MissingVariable { name })
}

fn parse_u64<F>(lookup: &F, name: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, name)
        .map(|raw| {
            raw.trim().parse::<u64>().map_err(|_| {
                LaunchError::Config(format!("{} must be a whole number, got '{}'", name, raw))
            })
        })
        .transpose()
}
