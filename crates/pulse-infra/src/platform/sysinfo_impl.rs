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

//! sysinfo-based implementation of the SignalSource trait.

use pulse_core::{BatteryLevel, ConnectionType, PlatformSignals, SignalSource};
use std::sync::{Arc, Mutex};
use sysinfo::System;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const DEFAULT_VIEWPORT_WIDTH: u32 = 1920;

/// Reads memory, core count and OS identity from the native host.
///
/// Native hosts always have a monotonic high-resolution clock. Viewport width
/// is not something `sysinfo` knows, so it is supplied by the embedder.
pub struct SysinfoSignalSource {
    system: Arc<Mutex<System>>,
    viewport_width: u32,
}

impl SysinfoSignalSource {
    /// Creates a new source, assuming a full-HD viewport.
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_all();
        Self {
            system: Arc::new(Mutex::new(system)),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
        }
    }

    /// Sets the viewport width reported to the capability detector.
    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }

    fn host_identity() -> String {
        let name = System::name().unwrap_or_else(|| "unknown".to_string());
        let version = System::os_version().unwrap_or_default();
        format!("{name} {version} {}", std::env::consts::ARCH)
            .trim()
            .to_string()
    }
}

impl SignalSource for SysinfoSignalSource {
    fn read(&self) -> Option<PlatformSignals> {
        let system = self.system.lock().ok()?;
        let total = system.total_memory();
        let device_memory_gb = (total > 0).then(|| (total as f64 / BYTES_PER_GB) as f32);
        let cores = u32::try_from(system.cpus().len()).ok().filter(|c| *c > 0);
        drop(system);

        let signals = PlatformSignals {
            user_agent: Self::host_identity(),
            viewport_width: self.viewport_width,
            device_memory_gb,
            cores,
            connection: ConnectionType::Unknown,
            high_res_timer: true,
            // sysinfo does not expose battery state.
            battery: BatteryLevel::Mains,
        };
        log::debug!("Host signals: {signals:?}");
        Some(signals)
    }
}

impl Default for SysinfoSignalSource {
    fn default() -> Self {
        Self::new()
    }
}
