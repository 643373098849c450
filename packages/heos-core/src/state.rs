//! Client configuration.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{HeosError, HeosResult};
use crate::predictor::DEFAULT_DRIFT_TOLERANCE_MS;

/// Configuration for the HEOS remote client.
///
/// All fields have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    // Server
    /// Base URL of the HEOS bridge serving commands and the event stream.
    pub base_url: String,

    /// Path of the event stream, relative to `base_url`.
    pub events_path: String,

    /// Timeout for a single outbound command (seconds).
    pub command_timeout_secs: u64,

    /// Issue seek commands when a position drag ends.
    pub seek_supported: bool,

    // Rendering
    /// Interval between render ticks (milliseconds). 16ms is roughly 60Hz.
    pub tick_interval_ms: u64,

    /// Divergence between predicted and reported position before a snap (milliseconds).
    pub drift_tolerance_ms: u64,

    /// Capacity of the client event broadcast channel.
    pub event_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            events_path: "/sse".to_string(),
            command_timeout_secs: 5,
            seek_supported: false,
            tick_interval_ms: 16,
            drift_tolerance_ms: DEFAULT_DRIFT_TOLERANCE_MS,
            event_channel_capacity: 100,
        }
    }
}

impl Config {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`HeosError::Configuration`] for values that would break the
    /// client at runtime.
    pub fn validate(&self) -> HeosResult<()> {
        Url::parse(&self.base_url)
            .map_err(|e| HeosError::Configuration(format!("base_url: {}", e)))?;
        if self.tick_interval_ms == 0 {
            return Err(HeosError::Configuration(
                "tick_interval_ms must be >= 1".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(HeosError::Configuration(
                "event_channel_capacity must be >= 1 (broadcast::channel panics on 0)".to_string(),
            ));
        }
        if self.command_timeout_secs == 0 {
            return Err(HeosError::Configuration(
                "command_timeout_secs must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Full URL of the event stream.
    #[must_use]
    pub fn events_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.events_path.trim_start_matches('/')
        )
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
