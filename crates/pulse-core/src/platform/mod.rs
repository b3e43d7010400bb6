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

//! Abstractions over the host signals the runtime reads.
//!
//! Nothing here queries the host directly. A [`SignalSource`] implementation
//! (see `pulse-infra`) produces a [`PlatformSignals`] snapshot, and every
//! classification downstream works from that snapshot alone.

use serde::{Deserialize, Serialize};

/// The effective network connection type reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    /// Very slow 2G connection.
    #[serde(rename = "slow-2g")]
    Slow2g,
    /// 2G connection.
    #[serde(rename = "2g")]
    TwoG,
    /// 3G connection.
    #[serde(rename = "3g")]
    ThreeG,
    /// 4G or better.
    #[serde(rename = "4g")]
    FourG,
    /// The host does not report a connection type.
    #[default]
    Unknown,
}

impl ConnectionType {
    /// Parses the host's effective-type string (`"slow-2g"`, `"2g"`, `"3g"`, `"4g"`).
    ///
    /// Anything unrecognised maps to [`ConnectionType::Unknown`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "slow-2g" => Self::Slow2g,
            "2g" => Self::TwoG,
            "3g" => Self::ThreeG,
            "4g" => Self::FourG,
            _ => Self::Unknown,
        }
    }

    /// Returns `true` for connection types that mark a constrained device.
    pub fn is_constrained(self) -> bool {
        matches!(self, Self::Slow2g | Self::TwoG | Self::ThreeG)
    }
}

/// Represents the power source and battery level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BatteryLevel {
    /// Device is connected to a stable power source.
    #[default]
    Mains,
    /// Battery is high (e.g. > 50%).
    High,
    /// Battery is low (e.g. < 20%).
    Low,
    /// Battery is at critical level, power saving is mandatory.
    Critical,
}

impl BatteryLevel {
    /// Returns `true` when the device should save power.
    pub fn is_low(self) -> bool {
        matches!(self, Self::Low | Self::Critical)
    }
}

/// A snapshot of the static host signals the capability detector consumes.
///
/// Optional fields are `None` when the host does not expose the hint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformSignals {
    /// The user agent string.
    pub user_agent: String,
    /// Viewport width in CSS pixels.
    pub viewport_width: u32,
    /// Reported device memory, in gigabytes.
    pub device_memory_gb: Option<f32>,
    /// Reported logical CPU core count.
    pub cores: Option<u32>,
    /// Effective network type.
    pub connection: ConnectionType,
    /// Whether a high-resolution monotonic clock is available.
    pub high_res_timer: bool,
    /// Current battery state.
    pub battery: BatteryLevel,
}

/// A source of [`PlatformSignals`].
///
/// Returns `None` when the runtime lacks the globals needed to read anything,
/// e.g. when evaluated outside a rendering host.
pub trait SignalSource: Send + Sync {
    /// Reads the current host signals.
    fn read(&self) -> Option<PlatformSignals>;
}
