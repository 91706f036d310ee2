//! Client configuration.
//!
//! Loaded from a TOML file resolved through a fallback chain, with
//! CLI flags overriding file values:
//! 1. `$PARADACTL_CONFIG` (explicit override)
//! 2. `$XDG_CONFIG_HOME/parada/config.toml`
//! 3. `~/.config/parada/config.toml`
//!
//! A missing file is not an error; defaults apply.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default backend base URL (the Flask dev server).
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL, no trailing slash.
    pub api_base: String,
    /// Machine this dashboard scopes itself to.
    pub machine: String,
    /// Seconds between `/api/data` polls.
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            machine: parada_common::MONITORED_MACHINE.to_string(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Config {
    /// Resolve the config file path through the fallback chain.
    pub fn discover_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PARADACTL_CONFIG") {
            return Some(PathBuf::from(path));
        }
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("parada/config.toml"));
        }
        dirs::home_dir().map(|home| home.join(".config/parada/config.toml"))
    }

    /// Load the config file if one exists, else defaults.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::discover_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        Ok(config)
    }

    /// Apply CLI flag overrides on top of file values.
    pub fn with_overrides(mut self, api_base: Option<String>, machine: Option<String>) -> Self {
        if let Some(base) = api_base {
            self.api_base = base;
        }
        if let Some(machine) = machine {
            self.machine = machine;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.machine, "Máquina 01");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(r#"api_base = "https://maroni.example""#).unwrap();
        assert_eq!(config.api_base, "https://maroni.example");
        assert_eq!(config.machine, "Máquina 01");
        assert_eq!(config.poll_interval_secs, 5);
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = Config::default()
            .with_overrides(Some("https://other.example".into()), Some("Máquina 02".into()));
        assert_eq!(config.api_base, "https://other.example");
        assert_eq!(config.machine, "Máquina 02");
    }
}
