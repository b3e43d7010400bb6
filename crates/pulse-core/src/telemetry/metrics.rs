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

//! The gauges published alongside the frame metrics.

use std::fmt;

/// A runtime gauge sampled on every metrics tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuntimeGauge {
    /// Rounded frames per second.
    CurrentFps,
    /// Jank score in `0.0..=1.0`.
    JankScore,
    /// Resources holding an admission slot.
    ActiveScenes,
    /// Constructions waiting for their turn.
    QueuedLoads,
}

impl RuntimeGauge {
    /// Every gauge, in publishing order.
    pub const ALL: [RuntimeGauge; 4] = [
        Self::CurrentFps,
        Self::JankScore,
        Self::ActiveScenes,
        Self::QueuedLoads,
    ];

    /// Dotted name for dashboards, e.g. `frames.current_fps`.
    pub fn name(self) -> &'static str {
        match self {
            Self::CurrentFps => "frames.current_fps",
            Self::JankScore => "frames.jank_score",
            Self::ActiveScenes => "admission.active",
            Self::QueuedLoads => "shield.queued",
        }
    }
}

impl fmt::Display for RuntimeGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
