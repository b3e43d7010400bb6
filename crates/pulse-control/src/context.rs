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

//! External conditions the runtime reacts to but does not derive.

use pulse_core::telemetry::FreezeSignal;
use pulse_core::{MemoryPressureLevel, Priority};

/// Externally supplied pressure signals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressureContext {
    /// Current memory pressure, as reported by the host.
    pub memory_pressure: MemoryPressureLevel,
    /// Whether a battery saver asked consumers to freeze.
    pub frozen: bool,
}

impl PressureContext {
    /// Whether a resource of `priority` should be skipped in favour of a
    /// static fallback instead of being constructed.
    ///
    /// | Memory pressure | Critical | Others |
    /// |---|---|---|
    /// | Normal | load | load |
    /// | Elevated | load | load |
    /// | Critical | load | skip |
    pub fn should_defer(&self, priority: Priority) -> bool {
        self.memory_pressure == MemoryPressureLevel::Critical && !priority.is_critical()
    }

    /// Applies a battery-saver advisory.
    pub fn apply_freeze(&mut self, signal: FreezeSignal) {
        self.frozen = signal == FreezeSignal::Freeze;
    }
}
