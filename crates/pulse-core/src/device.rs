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

//! Static device classification and the admission capacity table.

use crate::platform::PlatformSignals;
use serde::{Deserialize, Serialize};

/// Memory assumed when the host does not report it, in gigabytes.
pub const DEFAULT_MEMORY_GB: f32 = 4.0;
/// Core count assumed when the host does not report it.
pub const DEFAULT_CORES: u32 = 4;
/// Viewports narrower than this are treated as mobile.
pub const MOBILE_VIEWPORT_MAX: u32 = 768;
/// Devices reporting less memory than this are low-memory.
pub const LOW_MEMORY_THRESHOLD_GB: f32 = 4.0;

const MOBILE_UA_TOKENS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

/// Fixed mapping from device class to the number of heavy resources that may
/// be live at once.
///
/// The table is a compile-time constant; see [`AdmissionPolicy::STANDARD`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissionPolicy {
    /// Capacity of a mobile, low-memory device.
    pub mobile_low_memory: u32,
    /// Capacity of a mobile device at or above `mobile_roomy_gb`.
    pub mobile_roomy: u32,
    /// Memory threshold for `mobile_roomy`.
    pub mobile_roomy_gb: f32,
    /// Capacity of any other mobile device.
    pub mobile_default: u32,
    /// Capacity of a desktop at or above `desktop_roomy_gb`.
    pub desktop_roomy: u32,
    /// Memory threshold for `desktop_roomy`.
    pub desktop_roomy_gb: f32,
    /// Capacity of any other desktop.
    pub desktop_default: u32,
}

impl AdmissionPolicy {
    /// The session policy.
    pub const STANDARD: Self = Self {
        mobile_low_memory: 1,
        mobile_roomy: 2,
        mobile_roomy_gb: 6.0,
        mobile_default: 1,
        desktop_roomy: 4,
        desktop_roomy_gb: 8.0,
        desktop_default: 3,
    };

    /// Looks up the capacity for a device class. Rows are checked top to bottom.
    pub fn capacity(&self, is_mobile: bool, is_low_memory: bool, memory_gb: f32) -> u32 {
        match (is_mobile, is_low_memory) {
            (true, true) => self.mobile_low_memory,
            (true, false) if memory_gb >= self.mobile_roomy_gb => self.mobile_roomy,
            (true, false) => self.mobile_default,
            (false, _) if memory_gb >= self.desktop_roomy_gb => self.desktop_roomy,
            (false, _) => self.desktop_default,
        }
    }
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A one-shot classification of the running device.
///
/// Computed once per session and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Whether the device is a phone or tablet.
    pub is_mobile: bool,
    /// Whether the device has little memory or a slow connection.
    pub is_low_memory: bool,
    /// Logical CPU cores.
    pub cores: u32,
    /// Device memory in gigabytes.
    pub memory_gb: f32,
    /// How many heavy resources may be live at once.
    pub max_concurrent_scenes: u32,
}

impl DeviceProfile {
    /// The profile used when no host signals are available.
    pub fn desktop_default() -> Self {
        Self {
            is_mobile: false,
            is_low_memory: false,
            cores: DEFAULT_CORES,
            memory_gb: DEFAULT_MEMORY_GB,
            max_concurrent_scenes: AdmissionPolicy::STANDARD.desktop_default,
        }
    }

    /// Classifies a device from its host signals using [`AdmissionPolicy::STANDARD`].
    pub fn from_signals(signals: &PlatformSignals) -> Self {
        Self::from_signals_with(signals, &AdmissionPolicy::STANDARD)
    }

    /// Classifies a device from its host signals using the given policy.
    pub fn from_signals_with(signals: &PlatformSignals, policy: &AdmissionPolicy) -> Self {
        let memory_gb = signals
            .device_memory_gb
            .filter(|m| m.is_finite() && *m > 0.0)
            .unwrap_or(DEFAULT_MEMORY_GB);
        let cores = signals.cores.filter(|c| *c > 0).unwrap_or(DEFAULT_CORES);

        let is_mobile = is_mobile_agent(&signals.user_agent)
            || (signals.viewport_width > 0 && signals.viewport_width < MOBILE_VIEWPORT_MAX);
        let is_low_memory =
            memory_gb < LOW_MEMORY_THRESHOLD_GB || signals.connection.is_constrained();

        Self {
            is_mobile,
            is_low_memory,
            cores,
            memory_gb,
            max_concurrent_scenes: policy.capacity(is_mobile, is_low_memory, memory_gb),
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::desktop_default()
    }
}

/// Returns `true` if the user agent names a phone or tablet.
pub fn is_mobile_agent(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    MOBILE_UA_TOKENS.iter().any(|token| ua.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ConnectionType;

    fn signals(ua: &str, width: u32, memory: Option<f32>) -> PlatformSignals {
        PlatformSignals {
            user_agent: ua.to_string(),
            viewport_width: width,
            device_memory_gb: memory,
            ..Default::default()
        }
    }

    #[test]
    fn test_mobile_detection_by_agent_and_viewport() {
        assert!(is_mobile_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"));
        assert!(is_mobile_agent("Mozilla/5.0 (Linux; Android 14)"));
        assert!(!is_mobile_agent("Mozilla/5.0 (X11; Linux x86_64)"));

        let narrow = DeviceProfile::from_signals(&signals("desktop", 500, Some(8.0)));
        assert!(narrow.is_mobile, "A viewport under 768px should count as mobile");
        let wide = DeviceProfile::from_signals(&signals("desktop", 1440, Some(8.0)));
        assert!(!wide.is_mobile);
    }

    #[test]
    fn test_decision_table() {
        let p = AdmissionPolicy::STANDARD;
        assert_eq!(p.capacity(true, true, 8.0), 1, "Low memory wins over a roomy mobile");
        assert_eq!(p.capacity(true, false, 6.0), 2);
        assert_eq!(p.capacity(true, false, 4.0), 1);
        assert_eq!(p.capacity(false, false, 8.0), 4);
        assert_eq!(p.capacity(false, false, 16.0), 4);
        assert_eq!(p.capacity(false, false, 4.0), 3);
        assert_eq!(p.capacity(false, true, 2.0), 3);
    }

    #[test]
    fn test_low_memory_from_connection() {
        let mut s = signals("Android", 400, Some(8.0));
        s.connection = ConnectionType::ThreeG;
        let profile = DeviceProfile::from_signals(&s);
        assert!(profile.is_low_memory, "A 3g connection should mark the device low-memory");
        assert_eq!(profile.max_concurrent_scenes, 1);
    }

    #[test]
    fn test_missing_hints_use_defaults() {
        let profile = DeviceProfile::from_signals(&signals("", 1280, None));
        assert_eq!(profile.memory_gb, DEFAULT_MEMORY_GB);
        assert_eq!(profile.cores, DEFAULT_CORES);
        assert!(!profile.is_low_memory);
        assert_eq!(profile.max_concurrent_scenes, 3);
    }

    #[test]
    fn test_desktop_default() {
        let profile = DeviceProfile::default();
        assert!(!profile.is_mobile);
        assert_eq!(profile.max_concurrent_scenes, 3);
    }
}
