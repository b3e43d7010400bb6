// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Runtime configuration.

use pulse_telemetry::monitor::{MAX_INTERVAL, MIN_INTERVAL};
use pulse_telemetry::FpsMonitorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Failure to load a [`RuntimeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON is malformed or has the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field has an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings of a [`PerformanceRuntime`](crate::PerformanceRuntime).
///
/// Missing fields take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Metrics recompute cadence in milliseconds. Clamped to 400..=500.
    pub metrics_interval_ms: u64,
    /// Window of the raw frame sampler.
    pub raw_window: usize,
    /// Frame intervals above this are treated as freezes, not jank.
    pub max_valid_delta_ms: f64,
    /// Whether to try the precision measurement engine first.
    pub prefer_precision_engine: bool,
    /// Capacity of the telemetry event channel. Events are dropped when full.
    pub telemetry_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            metrics_interval_ms: 450,
            raw_window: 240,
            max_valid_delta_ms: 500.0,
            prefer_precision_engine: true,
            telemetry_buffer_size: 256,
        }
    }
}

impl RuntimeConfig {
    /// Loads a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Checks the fields that have no sensible fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.raw_window == 0 {
            return Err(ConfigError::Invalid("raw_window must be at least 1".into()));
        }
        if self.telemetry_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "telemetry_buffer_size must be at least 1".into(),
            ));
        }
        if !(self.max_valid_delta_ms.is_finite() && self.max_valid_delta_ms > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_valid_delta_ms must be positive, got {}",
                self.max_valid_delta_ms
            )));
        }
        Ok(())
    }

    /// The recompute cadence, clamped to the supported range.
    pub fn metrics_interval(&self) -> Duration {
        let requested = Duration::from_millis(self.metrics_interval_ms);
        let clamped = requested.clamp(MIN_INTERVAL, MAX_INTERVAL);
        if clamped != requested {
            log::warn!(
                "metrics_interval_ms={} is outside 400..=500, using {}ms",
                self.metrics_interval_ms,
                clamped.as_millis()
            );
        }
        clamped
    }

    /// Settings for the frame monitor.
    pub fn monitor_config(&self) -> FpsMonitorConfig {
        FpsMonitorConfig {
            interval: self.metrics_interval(),
            raw_window: self.raw_window,
            max_valid_delta_ms: self.max_valid_delta_ms,
            prefer_precision: self.prefer_precision_engine,
        }
    }
}
