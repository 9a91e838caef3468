use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ConfigError;

/// Default poll cadence for tracked terms, in minutes.
pub const DEFAULT_POLL_INTERVAL_MINUTES: u64 = 10;
/// Maximum number of terms a single user may track.
pub const DEFAULT_TRACKING_LIMIT: usize = 5;
/// Public OLX search API host.
pub const DEFAULT_OLX_BASE_URL: &str = "https://www.olx.ua";
/// Offers requested per search call.
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Top-level config (olxwatch.toml + OLXWATCH_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub olx: OlxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Allowlist entries: numeric Telegram user ids or usernames (with or
    /// without `@`). `"*"` allows everyone; an empty list denies everyone.
    ///
    /// Accepts a TOML array or a single comma-separated string, so
    /// `OLXWATCH_TELEGRAM__ALLOW_USERS=123,456` works from the environment.
    #[serde(default, deserialize_with = "list_or_comma_separated")]
    pub allow_users: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default = "default_tracking_limit")]
    pub tracking_limit: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            tracking_limit: default_tracking_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OlxConfig {
    #[serde(default = "default_olx_base_url")]
    pub base_url: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl Default for OlxConfig {
    fn default() -> Self {
        Self {
            base_url: default_olx_base_url(),
            search_limit: default_search_limit(),
        }
    }
}

impl WatchConfig {
    /// Load config from a TOML file with OLXWATCH_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.olxwatch/olxwatch.toml
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: WatchConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("OLXWATCH_").split("__"))
            .extract()
            .map_err(|e| ConfigError(e.to_string()))?;

        Ok(config)
    }
}

/// Deserialize either `["a", "b"]` or `"a,b"` into a vector.
fn list_or_comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString {
        List(Vec<String>),
        One(String),
    }

    Ok(match ListOrString::deserialize(deserializer)? {
        ListOrString::List(list) => list,
        ListOrString::One(s) => s
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect(),
    })
}

fn default_interval_minutes() -> u64 {
    DEFAULT_POLL_INTERVAL_MINUTES
}
fn default_tracking_limit() -> usize {
    DEFAULT_TRACKING_LIMIT
}
fn default_olx_base_url() -> String {
    DEFAULT_OLX_BASE_URL.to_string()
}
fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.olxwatch/olxwatch.db", home)
}
fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.olxwatch/olxwatch.toml", home)
}
