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

use super::{MeasurementProfile, FRAME_BUDGET_MS};
use crate::clock::FrameClock;
use crate::error::SamplerError;
use crate::ring::{percentile, RingBuffer};
use pulse_core::telemetry::FrameStats;
use pulse_core::{FrameSampler, PlatformSignals};
use std::time::Duration;

/// Intervals at or above this are never recorded by the precision engine.
const GAP_BOUND_MS: f64 = 500.0;
/// Samples needed before statistics are considered reliable.
pub const RELIABLE_SAMPLE_COUNT: usize = 30;

/// The capability-selected measurement engine.
///
/// Keeps a profile-sized window and refreshes [`FrameStats`] on the profile's
/// cadence, measured on the frame timeline itself.
#[derive(Debug, Clone)]
pub struct PrecisionFrameSampler {
    profile: MeasurementProfile,
    clock: FrameClock,
    deltas: RingBuffer<f64>,
    last_stats_at: Option<Duration>,
    stats: Option<FrameStats>,
}

impl PrecisionFrameSampler {
    /// Builds the engine for the given host, selecting its profile once.
    ///
    /// Fails when the host cannot time frames precisely.
    pub fn try_new(signals: &PlatformSignals) -> Result<Self, SamplerError> {
        if !signals.high_res_timer {
            return Err(SamplerError::NoHighResTimer);
        }
        Self::with_profile(MeasurementProfile::select(signals))
    }

    /// Builds the engine with an explicit profile.
    pub fn with_profile(profile: MeasurementProfile) -> Result<Self, SamplerError> {
        if profile.window_size == 0 {
            return Err(SamplerError::InvalidWindow(profile.window_size));
        }
        log::debug!(
            "Precision sampler using {:?} profile (window {}, stats every {:?})",
            profile.kind,
            profile.window_size,
            profile.stats_interval
        );
        Ok(Self {
            profile,
            clock: FrameClock::strict(GAP_BOUND_MS),
            deltas: RingBuffer::with_capacity(profile.window_size),
            last_stats_at: None,
            stats: None,
        })
    }

    /// The profile chosen at construction.
    pub fn profile(&self) -> &MeasurementProfile {
        &self.profile
    }

    /// Computes statistics over the current window, ignoring the cadence.
    pub fn compute_stats(&self) -> Option<FrameStats> {
        let mean = self.deltas.average()?;
        let sorted = self.deltas.sorted();
        let count = sorted.len();
        Some(FrameStats {
            average_fps: 1000.0 / mean,
            min_frame_ms: sorted[0],
            max_frame_ms: sorted[count - 1],
            p50_frame_ms: percentile(&sorted, 50.0),
            p95_frame_ms: percentile(&sorted, 95.0),
            p99_frame_ms: percentile(&sorted, 99.0),
            dropped_frames: sorted.iter().filter(|d| **d > FRAME_BUDGET_MS).count(),
            frame_time_std_dev: self.deltas.variance().sqrt(),
            sample_count: count,
            is_reliable: count >= RELIABLE_SAMPLE_COUNT,
        })
    }
}

impl FrameSampler for PrecisionFrameSampler {
    fn name(&self) -> &'static str {
        "precision"
    }

    fn record_frame(&mut self, now: Duration) {
        if let Some(sample) = self.clock.tick(now) {
            self.deltas.push(sample.frame_delta_ms);
        }

        let due = match self.last_stats_at {
            None => true,
            Some(at) => now.saturating_sub(at) >= self.profile.stats_interval,
        };
        if due {
            self.last_stats_at = Some(now);
            self.stats = self.compute_stats();
        }
    }

    fn sample_count(&self) -> usize {
        self.deltas.count()
    }

    fn average_delta_ms(&self) -> Option<f64> {
        self.deltas.average()
    }

    fn frame_stats(&self) -> Option<FrameStats> {
        self.stats
    }

    fn reset(&mut self) {
        self.clock.reset();
        self.deltas.clear();
        self.last_stats_at = None;
        self.stats = None;
    }
}
