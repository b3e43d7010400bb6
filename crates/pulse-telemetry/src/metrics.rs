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

//! Metric formulas and the shared pull handle consumers read from.

use crate::tier::classify;
use pulse_core::telemetry::FrameStats;
use pulse_core::PerformanceMetrics;
use std::sync::{Arc, RwLock};

/// Baseline the jank score is measured against.
pub const BASELINE_FPS: f32 = 60.0;

/// Derives a metrics snapshot from a mean frame interval.
pub fn metrics_from_average(avg_delta_ms: f64) -> PerformanceMetrics {
    let fps = (1000.0 / avg_delta_ms).round();
    let current_fps = if fps.is_finite() && fps >= 1.0 {
        fps.min(u32::MAX as f64) as u32
    } else {
        1
    };
    let jank_score = ((BASELINE_FPS - current_fps as f32) / BASELINE_FPS).clamp(0.0, 1.0);
    PerformanceMetrics {
        current_fps,
        jank_score,
        device_tier: classify(current_fps),
    }
}

#[derive(Debug, Clone, Default)]
struct Snapshot {
    metrics: PerformanceMetrics,
    stats: Option<FrameStats>,
    source: Option<&'static str>,
    frozen: bool,
}

/// A cheap, cloneable handle to the latest metrics.
///
/// Readers never block on the sampler; they see whatever the last tick wrote.
#[derive(Debug, Clone, Default)]
pub struct MetricsHandle {
    inner: Arc<RwLock<Snapshot>>,
}

impl MetricsHandle {
    /// Creates a handle holding the default metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest metrics.
    pub fn latest(&self) -> PerformanceMetrics {
        self.read(|s| s.metrics)
    }

    /// The latest extended statistics, when the active engine computes them.
    pub fn frame_stats(&self) -> Option<FrameStats> {
        self.read(|s| s.stats)
    }

    /// Which sampler produced the latest metrics.
    pub fn source(&self) -> Option<&'static str> {
        self.read(|s| s.source)
    }

    /// Whether the latest battery-saver advisory was a freeze.
    pub fn is_frozen(&self) -> bool {
        self.read(|s| s.frozen)
    }

    pub(crate) fn publish(
        &self,
        metrics: PerformanceMetrics,
        stats: Option<FrameStats>,
        source: &'static str,
    ) {
        self.write(|s| {
            s.metrics = metrics;
            s.stats = stats;
            s.source = Some(source);
        });
    }

    pub(crate) fn set_frozen(&self, frozen: bool) {
        self.write(|s| s.frozen = frozen);
    }

    fn read<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    fn write(&self, f: impl FnOnce(&mut Snapshot)) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }
}
