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

use pulse_core::device::{DEFAULT_CORES, DEFAULT_MEMORY_GB, LOW_MEMORY_THRESHOLD_GB, MOBILE_VIEWPORT_MAX};
use pulse_core::PlatformSignals;
use std::time::Duration;

const TABLET_VIEWPORT_MAX: u32 = 1024;

/// Which device class a profile was chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKind {
    /// Battery is low; coarse measurements.
    BatterySaver,
    /// Little memory or a single core.
    LowEnd,
    /// Phone-sized viewport.
    Mobile,
    /// Tablet-sized viewport.
    Tablet,
    /// Everything else.
    Desktop,
}

/// Window size and statistics cadence of the precision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementProfile {
    /// The device class.
    pub kind: ProfileKind,
    /// Number of intervals kept.
    pub window_size: usize,
    /// How often extended statistics are refreshed.
    pub stats_interval: Duration,
}

impl MeasurementProfile {
    /// Builds the profile for a device class.
    pub const fn for_kind(kind: ProfileKind) -> Self {
        let (window_size, stats_ms) = match kind {
            ProfileKind::BatterySaver => (60, 2000),
            ProfileKind::LowEnd => (60, 1500),
            ProfileKind::Mobile => (90, 1000),
            ProfileKind::Tablet => (120, 1000),
            ProfileKind::Desktop => (240, 500),
        };
        Self {
            kind,
            window_size,
            stats_interval: Duration::from_millis(stats_ms),
        }
    }

    /// Picks a profile once from the host capabilities and battery state.
    ///
    /// Rows are checked in order: battery, low-end, mobile, tablet, desktop.
    /// A zero viewport width means the host did not report one.
    pub fn select(signals: &PlatformSignals) -> Self {
        let memory = signals.device_memory_gb.unwrap_or(DEFAULT_MEMORY_GB);
        let cores = signals.cores.unwrap_or(DEFAULT_CORES);
        let width = signals.viewport_width;

        let kind = if signals.battery.is_low() {
            ProfileKind::BatterySaver
        } else if memory < LOW_MEMORY_THRESHOLD_GB || cores < 2 {
            ProfileKind::LowEnd
        } else if width == 0 {
            // Unknown viewport.
            ProfileKind::Desktop
        } else if width < MOBILE_VIEWPORT_MAX {
            ProfileKind::Mobile
        } else if width < TABLET_VIEWPORT_MAX {
            ProfileKind::Tablet
        } else {
            ProfileKind::Desktop
        };
        Self::for_kind(kind)
    }
}
