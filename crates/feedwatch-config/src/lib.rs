//! Shared configuration for the feedwatch CLI and TUI.
//!
//! Dashboard settings live in one TOML file; every field can be overridden
//! with a `FEEDWATCH_`-prefixed environment variable (sections joined by a
//! double underscore, e.g. `FEEDWATCH_DASHBOARD__REFRESH_INTERVAL=60`).
//! [`Config::to_runtime`] translates the file into core runtime types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

use feedwatch_core::{ApiConfig, DatasetMode, LatencyProfile, PollConfig, RetryPolicy, Severity};

pub const ENV_PREFIX: &str = "FEEDWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardSettings,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub advanced: AdvancedSettings,

    #[serde(default)]
    pub mock: MockSettings,

    /// CLI output defaults.
    #[serde(default)]
    pub defaults: Defaults,
}

/// Color scheme preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// Follow the terminal.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardSettings {
    /// Dashboard and Feeds polling period, seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Alerts polling period, seconds.
    #[serde(default = "default_alert_refresh_interval")]
    pub alert_refresh_interval: u64,

    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    /// Lowest severity shown in alert listings.
    #[serde(default)]
    pub alert_threshold: Severity,

    #[serde(default)]
    pub theme: Theme,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            alert_refresh_interval: default_alert_refresh_interval(),
            auto_refresh: true,
            alert_threshold: Severity::Low,
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationSettings {
    /// In-app toasts.
    #[serde(default = "default_true")]
    pub show_notifications: bool,
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default)]
    pub sms: bool,
    #[serde(default)]
    pub slack: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            show_notifications: true,
            email: true,
            sms: false,
            slack: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AdvancedSettings {
    /// Retries per poll cycle for transient failures (1–10).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout, seconds (30–600).
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// `error`, `warn`, `info`, `debug`, or `trace`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout: default_timeout(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MockSettings {
    #[serde(default)]
    pub dataset: DatasetMode,

    /// Fixed seed for reproducible data.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_alert_refresh_interval() -> u64 {
    15
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

// ── Validation & translation ────────────────────────────────────────

/// Core runtime settings derived from a [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub api: ApiConfig,
    pub poll: PollConfig,
}

impl Config {
    /// Check ranges the settings page enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("dashboard.refresh_interval", self.dashboard.refresh_interval, 5, 3600)?;
        check_range(
            "dashboard.alert_refresh_interval",
            self.dashboard.alert_refresh_interval,
            5,
            3600,
        )?;
        check_range("advanced.max_retries", u64::from(self.advanced.max_retries), 1, 10)?;
        check_range("advanced.timeout", self.advanced.timeout, 30, 600)?;

        if !LOG_LEVELS.contains(&self.advanced.log_level.as_str()) {
            return Err(ConfigError::Validation {
                field: "advanced.log_level".into(),
                reason: format!(
                    "expected one of {}, got '{}'",
                    LOG_LEVELS.join(", "),
                    self.advanced.log_level
                ),
            });
        }
        Ok(())
    }

    /// Translate into core runtime types with the standard simulated latency.
    pub fn to_runtime(&self) -> RuntimeConfig {
        RuntimeConfig {
            api: ApiConfig {
                latency: LatencyProfile::default(),
                dataset: self.mock.dataset,
                seed: self.mock.seed,
            },
            poll: PollConfig {
                dashboard_interval: Duration::from_secs(self.dashboard.refresh_interval),
                feeds_interval: Duration::from_secs(self.dashboard.refresh_interval),
                alerts_interval: Duration::from_secs(self.dashboard.alert_refresh_interval),
                auto_refresh: self.dashboard.auto_refresh,
                request_timeout: Duration::from_secs(self.advanced.timeout),
                retry: RetryPolicy {
                    max_retries: self.advanced.max_retries,
                    ..RetryPolicy::default()
                },
            },
        }
    }
}

fn check_range(field: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("{value} is outside {min}..={max}"),
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "feedwatch", "feedwatch").map_or_else(
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
    p.push("feedwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load and validate config from `path` + environment.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = figment_for(path).extract()?;
    config.validate()?;
    Ok(config)
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config, returning defaults if it is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}
