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

//! Converts frame timestamps into validated intervals.

use pulse_core::PerformanceSample;
use std::time::Duration;

/// Tracks the previous frame and yields the interval to the next one.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Duration>,
    max_valid_delta_ms: f64,
    inclusive_bound: bool,
}

impl FrameClock {
    /// Accepts intervals up to and including `max_valid_delta_ms`.
    pub fn new(max_valid_delta_ms: f64) -> Self {
        Self {
            last: None,
            max_valid_delta_ms,
            inclusive_bound: true,
        }
    }

    /// Accepts intervals strictly below `max_valid_delta_ms`.
    pub fn strict(max_valid_delta_ms: f64) -> Self {
        Self {
            inclusive_bound: false,
            ..Self::new(max_valid_delta_ms)
        }
    }

    /// Advances to `now`.
    ///
    /// Returns the sample when it is worth recording. The first frame, zero
    /// or backwards intervals and gaps past the bound all return `None`,
    /// though the clock still moves to `now`.
    pub fn tick(&mut self, now: Duration) -> Option<PerformanceSample> {
        let previous = self.last.replace(now)?;
        let delta_ms = now.checked_sub(previous)?.as_nanos() as f64 / 1_000_000.0;
        let within = if self.inclusive_bound {
            delta_ms <= self.max_valid_delta_ms
        } else {
            delta_ms < self.max_valid_delta_ms
        };
        if delta_ms > 0.0 && within {
            Some(PerformanceSample {
                timestamp: now,
                frame_delta_ms: delta_ms,
            })
        } else {
            log::trace!("Discarded frame gap of {delta_ms:.1}ms");
            None
        }
    }

    /// Forgets the previous frame.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
