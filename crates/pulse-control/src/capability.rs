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

//! One-shot static classification of the running device.

use pulse_core::{AdmissionPolicy, DeviceProfile, PlatformSignals, SignalSource};
use std::sync::{Arc, OnceLock};

/// Reads host signals once and memoizes the resulting [`DeviceProfile`].
///
/// The detector is an injected service, not a global: each runtime (and each
/// test) owns its own instance.
pub struct CapabilityDetector {
    source: Arc<dyn SignalSource>,
    policy: AdmissionPolicy,
    signals: OnceLock<Option<PlatformSignals>>,
    profile: OnceLock<DeviceProfile>,
}

impl CapabilityDetector {
    /// Creates a detector over `source` using [`AdmissionPolicy::STANDARD`].
    pub fn new(source: Arc<dyn SignalSource>) -> Self {
        Self::with_policy(source, AdmissionPolicy::STANDARD)
    }

    /// Creates a detector with an explicit capacity table.
    pub fn with_policy(source: Arc<dyn SignalSource>, policy: AdmissionPolicy) -> Self {
        Self {
            source,
            policy,
            signals: OnceLock::new(),
            profile: OnceLock::new(),
        }
    }

    /// The host signals, read on first access.
    pub fn signals(&self) -> Option<&PlatformSignals> {
        self.signals.get_or_init(|| self.source.read()).as_ref()
    }

    /// Classifies the device. Computed on first call, then returned as is.
    ///
    /// Falls back to [`DeviceProfile::desktop_default`] when the source cannot
    /// read anything.
    pub fn detect(&self) -> DeviceProfile {
        *self.profile.get_or_init(|| {
            let profile = match self.signals() {
                Some(signals) => DeviceProfile::from_signals_with(signals, &self.policy),
                None => {
                    log::warn!("No host signals available, assuming a desktop device");
                    DeviceProfile::desktop_default()
                }
            };
            log::info!(
                "Device profile: mobile={}, low_memory={}, {} cores, {:.1}GB, capacity {}",
                profile.is_mobile,
                profile.is_low_memory,
                profile.cores,
                profile.memory_gb,
                profile.max_concurrent_scenes
            );
            profile
        })
    }
}

impl std::fmt::Debug for CapabilityDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityDetector")
            .field("profile", &self.profile.get())
            .finish_non_exhaustive()
    }
}
