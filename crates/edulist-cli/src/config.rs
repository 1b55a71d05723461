//! Persisted CLI settings.
//!
//! Values resolve in order: command-line flag, then `config.json` in the
//! platform config directory, then built-in defaults.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use edulist_core::ApiUrl;
use edulist_file::DEFAULT_PAGE_SIZE;
use edulist_http::DEFAULT_TIMEOUT;
use edulist_query::{DEFAULT_DEBOUNCE, DEFAULT_STALE_TIME, QueryConfig};

/// Base URL used when neither a flag nor the config file names one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Keys accepted by `edulist config set`.
pub const KEYS: &[&str] = &[
    "base_url",
    "stale_time_secs",
    "debounce_ms",
    "timeout_secs",
    "page_size",
];

/// Contents of `config.json`. Absent fields use the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_time_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

/// Settings after applying flags and defaults.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub base_url: ApiUrl,
    pub stale_time_secs: u64,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
    pub page_size: usize,
}

impl Settings {
    pub fn query_config(&self) -> QueryConfig {
        QueryConfig {
            stale_time: Duration::from_secs(self.stale_time_secs),
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl StoredConfig {
    /// Apply a `config set` assignment, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_url" => {
                ApiUrl::new(value).context("Invalid base URL")?;
                self.base_url = Some(value.to_string());
            }
            "stale_time_secs" => self.stale_time_secs = Some(parse_number(key, value)?),
            "debounce_ms" => self.debounce_ms = Some(parse_number(key, value)?),
            "timeout_secs" => {
                let secs = parse_number(key, value)?;
                if secs == 0 {
                    bail!("timeout_secs must be at least 1");
                }
                self.timeout_secs = Some(secs);
            }
            "page_size" => {
                let size: usize = value
                    .parse()
                    .with_context(|| format!("{} must be a whole number", key))?;
                if size == 0 {
                    bail!("page_size must be at least 1");
                }
                self.page_size = Some(size);
            }
            other => bail!("Unknown setting '{}'. Known settings: {}", other, KEYS.join(", ")),
        }
        Ok(())
    }

    /// Combine with the command-line base URL and the defaults.
    pub fn resolve(&self, base_url_flag: Option<&str>) -> Result<Settings> {
        let base_url = base_url_flag
            .or(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL);

        Ok(Settings {
            base_url: ApiUrl::new(base_url).context("Invalid base URL")?,
            stale_time_secs: self.stale_time_secs.unwrap_or(DEFAULT_STALE_TIME.as_secs()),
            debounce_ms: self
                .debounce_ms
                .unwrap_or(DEFAULT_DEBOUNCE.as_millis() as u64),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT.as_secs()),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("{} must be a whole number", key))
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "edulist").context("Could not determine config directory")?;

    Ok(dirs.config_dir().join("config.json"))
}

/// Load the config file, or defaults if there is none.
pub fn load() -> Result<StoredConfig> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(StoredConfig::default());
    }

    let json = fs::read_to_string(&path).context("Failed to read config file")?;
    serde_json::from_str(&json).context("Invalid config file")
}

/// Save the config file, creating its directory if needed.
pub fn save(config: &StoredConfig) -> Result<PathBuf> {
    let path = config_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).context("Failed to create config directory")?;
    }

    let json = serde_json::to_string_pretty(config)?;
    fs::write(&path, json).context("Failed to write config file")?;

    Ok(path)
}
