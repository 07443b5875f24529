// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable holding the Discord webhook URL.
pub const WEBHOOK_ENV: &str = "DISCORD_WEBHOOK_URL";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Events API settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Webhook message settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Polling loop timing
    #[serde(default)]
    pub watch: WatchConfig,

    /// Snapshot persistence
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.notifier.timeout_secs == 0 {
            return Err(AppError::validation("notifier.timeout_secs must be > 0"));
        }
        if self.watch.poll_interval_secs == 0 {
            return Err(AppError::validation("watch.poll_interval_secs must be > 0"));
        }
        if self.watch.max_lifetime_secs == 0 {
            return Err(AppError::validation("watch.max_lifetime_secs must be > 0"));
        }
        if self.storage.snapshot_file.as_os_str().is_empty() {
            return Err(AppError::validation("storage.snapshot_file is empty"));
        }
        Url::parse(&self.source.api_url)
            .map_err(|e| AppError::validation(format!("source.api_url: {e}")))?;
        Url::parse(&self.notifier.site_url)
            .map_err(|e| AppError::validation(format!("notifier.site_url: {e}")))?;
        Ok(())
    }

    /// Read the webhook URL from the environment.
    ///
    /// The webhook is a secret and never lives in the config file.
    pub fn webhook_url() -> Result<Url> {
        let raw = std::env::var(WEBHOOK_ENV)
            .map_err(|_| AppError::config(format!("{WEBHOOK_ENV} is not set")))?;
        parse_webhook_url(&raw)
    }
}

/// Parse and sanity-check a webhook URL value.
pub fn parse_webhook_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::config(format!("{WEBHOOK_ENV} is empty")));
    }
    let url = Url::parse(raw)
        .map_err(|e| AppError::config(format!("{WEBHOOK_ENV} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::config(format!(
            "{WEBHOOK_ENV} must be http(s), got {other}"
        ))),
    }
}

/// Events API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Endpoint returning `{ "error": bool, "response": [events] }`
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: defaults::api_url(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Webhook message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Display name of the posting bot
    #[serde(default = "defaults::username")]
    pub username: String,

    /// Base URL that event paths are resolved against
    #[serde(default = "defaults::site_url")]
    pub site_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            username: defaults::username(),
            site_url: defaults::site_url(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Polling loop timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Sleep between polls in seconds
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,

    /// Restart the watcher after running this long
    #[serde(default = "defaults::max_lifetime")]
    pub max_lifetime_secs: u64,
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: defaults::poll_interval(),
            max_lifetime_secs: defaults::max_lifetime(),
        }
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the last known snapshot
    #[serde(default = "defaults::snapshot_file")]
    pub snapshot_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_file: defaults::snapshot_file(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Source defaults
    pub fn api_url() -> String {
        "https://api.truckersmp.com/v2/vtc/49940/events/attending".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn user_agent() -> String {
        concat!("eventwatch/", env!("CARGO_PKG_VERSION")).into()
    }

    // Notifier defaults
    pub fn username() -> String {
        "TruckersMP Events Bot".into()
    }
    pub fn site_url() -> String {
        "https://truckersmp.com".into()
    }

    // Watch defaults
    pub fn poll_interval() -> u64 {
        10
    }
    pub fn max_lifetime() -> u64 {
        24 * 60 * 60
    }

    // Storage defaults
    pub fn snapshot_file() -> PathBuf {
        PathBuf::from("events_db.json")
    }
}
