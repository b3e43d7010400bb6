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

//! The two [`FrameSampler`](pulse_core::FrameSampler) implementations.
//!
//! [`RawFrameSampler`] is the always-available animation-frame sampler.
//! [`PrecisionFrameSampler`] is the capability-selected engine that also
//! reports extended [`FrameStats`](pulse_core::telemetry::FrameStats); building
//! it can fail, in which case callers keep the raw sampler.

mod precision;
mod profile;
mod raw;

pub use precision::{PrecisionFrameSampler, RELIABLE_SAMPLE_COUNT};
pub use profile::{MeasurementProfile, ProfileKind};
pub use raw::{RawFrameSampler, DEFAULT_MAX_VALID_DELTA_MS, DEFAULT_RAW_WINDOW};

/// Frame budget at 60 fps, in milliseconds.
pub const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;
