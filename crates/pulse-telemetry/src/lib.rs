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

//! Frame-rate telemetry for the performance runtime.
//!
//! Holds the ring buffer, the raw and precision [`FrameSampler`] implementations,
//! the device tier classifier and the [`FpsMonitor`] that ties them together on
//! a fixed recompute cadence.
//!
//! [`FrameSampler`]: pulse_core::FrameSampler

#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod ring;
pub mod sampler;
pub mod tier;

pub use error::SamplerError;
pub use metrics::{metrics_from_average, MetricsHandle};
pub use monitor::{FpsMonitor, FpsMonitorConfig};
pub use ring::RingBuffer;
pub use sampler::{MeasurementProfile, PrecisionFrameSampler, ProfileKind, RawFrameSampler};
pub use tier::classify;
