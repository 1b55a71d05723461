//! Config subcommand implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::config::{self, StoredConfig};
use crate::output;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the effective settings
    Show,

    /// Print the config file location
    Path,

    /// Persist one setting
    Set {
        /// Setting name (base_url, stale_time_secs, debounce_ms, timeout_secs, page_size)
        key: String,
        /// New value
        value: String,
    },
}

pub fn handle(cmd: ConfigCommand, base_url_flag: Option<&str>) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(base_url_flag),
        ConfigSubcommand::Path => {
            println!("{}", config::config_path()?.display());
            Ok(())
        }
        ConfigSubcommand::Set { key, value } => set(&key, &value),
    }
}

fn show(base_url_flag: Option<&str>) -> Result<()> {
    let settings = config::load()?.resolve(base_url_flag)?;

    output::field("base_url", settings.base_url.as_str());
    output::field("stale_time_secs", &settings.stale_time_secs.to_string());
    output::field("debounce_ms", &settings.debounce_ms.to_string());
    output::field("timeout_secs", &settings.timeout_secs.to_string());
    output::field("page_size", &settings.page_size.to_string());

    Ok(())
}

fn set(key: &str, value: &str) -> Result<()> {
    let mut stored: StoredConfig = config::load()?;
    stored
        .set(key, value)
        .with_context(|| format!("Cannot set {}", key))?;
    let path = config::save(&stored)?;

    output::success(&format!("Set {} = {}", key, value));
    output::field("File", &path.display().to_string());

    Ok(())
}
