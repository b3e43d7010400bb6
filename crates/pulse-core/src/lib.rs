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

//! # Pulse Core
//!
//! Foundational crate containing the plain data types and interface contracts
//! shared by the performance runtime: device profiles, resource handles,
//! frame samples and the telemetry vocabulary.

#![warn(missing_docs)]

pub mod device;
pub mod platform;
pub mod resource;
pub mod telemetry;

pub use device::{AdmissionPolicy, DeviceProfile};
pub use platform::{BatteryLevel, ConnectionType, PlatformSignals, SignalSource};
pub use resource::{AdmissionStatus, MemoryPressureLevel, Priority, ResourceHandle, ResourceId, ResourceState};
pub use telemetry::{DeviceTier, FrameSampler, PerformanceMetrics, PerformanceSample, TelemetryEvent};
