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

//! Provides the foundational traits and data structures for frame telemetry.
//!
//! This module defines the "common language" of the runtime's measurements:
//! raw frame samples, the recomputed metrics snapshot, the events published on
//! the telemetry channel and the [`FrameSampler`] contract. `pulse-telemetry`
//! provides the concrete samplers and the monitor that drives them.

pub mod event;
pub mod metrics;
pub mod performance;
pub mod sampler;

pub use self::event::TelemetryEvent;
pub use self::metrics::RuntimeGauge;
pub use self::performance::{
    DeviceTier, FrameStats, FreezeSignal, PerformanceMetrics, PerformanceSample,
};
pub use self::sampler::FrameSampler;
