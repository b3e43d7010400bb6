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

//! The contract shared by frame-interval samplers.

use crate::telemetry::performance::FrameStats;
use std::time::Duration;

/// A source of frame-interval measurements.
///
/// Implementations are fed one callback per rendered frame and keep a bounded
/// window of valid intervals. They never block and never fail once built.
pub trait FrameSampler: Send {
    /// A short name for logging.
    fn name(&self) -> &'static str;

    /// Records a frame at the monotonic time `now`.
    ///
    /// The first call only anchors the clock. Intervals above the sampler's
    /// validity bound (tab switches, freezes) are discarded.
    fn record_frame(&mut self, now: Duration);

    /// Number of valid intervals in the window.
    fn sample_count(&self) -> usize;

    /// Mean interval of the window in milliseconds, or `None` when empty.
    fn average_delta_ms(&self) -> Option<f64>;

    /// Extended statistics, for samplers that compute them.
    fn frame_stats(&self) -> Option<FrameStats> {
        None
    }

    /// Clears the window and the clock anchor.
    fn reset(&mut self);
}
