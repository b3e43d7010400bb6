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

use crate::clock::FrameClock;
use crate::ring::RingBuffer;
use pulse_core::FrameSampler;
use std::time::Duration;

/// Default window of the raw sampler.
pub const DEFAULT_RAW_WINDOW: usize = 240;
/// Default validity bound for a frame interval.
pub const DEFAULT_MAX_VALID_DELTA_MS: f64 = 500.0;

/// Mean-of-window sampler fed directly by animation-frame callbacks.
#[derive(Debug, Clone)]
pub struct RawFrameSampler {
    clock: FrameClock,
    deltas: RingBuffer<f64>,
}

impl RawFrameSampler {
    /// Creates a sampler keeping `window` intervals and discarding gaps above
    /// `max_valid_delta_ms`.
    pub fn new(window: usize, max_valid_delta_ms: f64) -> Self {
        Self {
            clock: FrameClock::new(max_valid_delta_ms),
            deltas: RingBuffer::with_capacity(window),
        }
    }
}

impl Default for RawFrameSampler {
    fn default() -> Self {
        Self::new(DEFAULT_RAW_WINDOW, DEFAULT_MAX_VALID_DELTA_MS)
    }
}

impl FrameSampler for RawFrameSampler {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn record_frame(&mut self, now: Duration) {
        if let Some(sample) = self.clock.tick(now) {
            self.deltas.push(sample.frame_delta_ms);
        }
    }

    fn sample_count(&self) -> usize {
        self.deltas.count()
    }

    fn average_delta_ms(&self) -> Option<f64> {
        self.deltas.average()
    }

    fn reset(&mut self) {
        self.clock.reset();
        self.deltas.clear();
    }
}
