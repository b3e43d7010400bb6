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

//! Frame samples and the metrics recomputed from them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One recorded frame interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// Monotonic time of the frame, relative to the clock's origin.
    pub timestamp: Duration,
    /// Milliseconds since the previous frame.
    pub frame_delta_ms: f64,
}

/// Discrete classification of currently observed rendering performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    /// Below 35 fps.
    Minimal,
    /// 35 fps and above.
    Low,
    /// 50 fps and above.
    Medium,
    /// 70 fps and above.
    High,
    /// 100 fps and above.
    Ultra,
}

/// The latest recomputed metrics. Superseded wholesale on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Rounded frames per second, never below 1.
    pub current_fps: u32,
    /// Shortfall against a 60 fps baseline, in `[0, 1]`.
    pub jank_score: f32,
    /// Tier of `current_fps`.
    pub device_tier: DeviceTier,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            current_fps: 60,
            jank_score: 0.0,
            device_tier: DeviceTier::Medium,
        }
    }
}

/// Extended statistics over a sampler window.
///
/// Frame times are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameStats {
    /// Mean frames per second over the window.
    pub average_fps: f64,
    /// Shortest frame time.
    pub min_frame_ms: f64,
    /// Longest frame time.
    pub max_frame_ms: f64,
    /// Median frame time.
    pub p50_frame_ms: f64,
    /// 95th percentile frame time.
    pub p95_frame_ms: f64,
    /// 99th percentile frame time.
    pub p99_frame_ms: f64,
    /// Frames that overran the 60 fps budget.
    pub dropped_frames: usize,
    /// Standard deviation of the frame time.
    pub frame_time_std_dev: f64,
    /// Samples in the window.
    pub sample_count: usize,
    /// Whether the window holds enough samples to trust.
    pub is_reliable: bool,
}

/// Advisory from an external battery saver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreezeSignal {
    /// Consumers may pause expensive work.
    Freeze,
    /// The freeze is lifted.
    Unfreeze,
}
