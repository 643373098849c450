//! Remote configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Remote configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the HEOS bridge.
    /// Override: `HEOS_BASE_URL`
    pub base_url: String,

    /// Event stream path relative to `base_url`.
    pub events_path: String,

    /// Render tick interval in milliseconds.
    /// Override: `HEOS_TICK_INTERVAL_MS`
    pub tick_interval_ms: u64,

    /// Position drift tolerated before snapping to a report (milliseconds).
    pub drift_tolerance_ms: u64,

    /// Per-command timeout in seconds.
    pub command_timeout_secs: u64,

    /// Send seek commands when a position drag ends.
    pub seek_supported: bool,

    /// Directory for persistent data (active player preference).
    /// Override: `HEOS_DATA_DIR`
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let core = heos_core::Config::default();
        Self {
            base_url: core.base_url,
            events_path: core.events_path,
            tick_interval_ms: core.tick_interval_ms,
            drift_tolerance_ms: core.drift_tolerance_ms,
            command_timeout_secs: core.command_timeout_secs,
            seek_supported: core.seek_supported,
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HEOS_BASE_URL") {
            if !val.trim().is_empty() {
                self.base_url = val.trim().to_string();
            }
        }

        if let Ok(val) = std::env::var("HEOS_TICK_INTERVAL_MS") {
            if let Ok(ms) = val.parse() {
                self.tick_interval_ms = ms;
            }
        }

        // Note: HEOS_DATA_DIR is handled by clap via #[arg(env = ...)] in main.rs
    }

    /// Converts to heos-core's Config type.
    pub fn to_core_config(&self) -> heos_core::Config {
        heos_core::Config {
            base_url: self.base_url.clone(),
            events_path: self.events_path.clone(),
            tick_interval_ms: self.tick_interval_ms,
            drift_tolerance_ms: self.drift_tolerance_ms,
            command_timeout_secs: self.command_timeout_secs,
            seek_supported: self.seek_supported,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_selected_fields() {
        let config = ClientConfig::from_yaml(
            "base_url: http://192.168.1.20:8080\nseek_supported: true\ndata_dir: /var/lib/heos\n",
        )
        .unwrap();

        assert_eq!(config.base_url, "http://192.168.1.20:8080");
        assert!(config.seek_supported);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/heos")));
        assert_eq!(config.tick_interval_ms, 16);

        let core = config.to_core_config();
        assert_eq!(core.events_url(), "http://192.168.1.20:8080/sse");
        assert!(core.validate().is_ok());
    }
}
