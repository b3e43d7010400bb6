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

//! The public-facing SDK of the performance runtime.
//!
//! Build one [`PerformanceRuntime`] per session, hand its [`SceneGate`] to
//! the components that construct heavy GPU resources, and feed it animation
//! frames. Everything else (device detection, admission, FIFO construction,
//! frame metrics) happens behind that handle.

#![warn(missing_docs)]

pub mod config;
pub mod events;
pub mod gate;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, RuntimeConfig};
pub use events::EventBus;
pub use gate::{GateDecision, SceneGate, SceneRequest};
pub use logging::init_logging;
pub use runtime::PerformanceRuntime;

/// Re-exports for embedders.
pub mod prelude {
    pub use pulse_control::{
        ConstructionCompletion, ConstructionError, LoadOutcome, SceneConstructor,
    };
    pub use pulse_core::telemetry::{FreezeSignal, FrameStats};
    pub use pulse_core::{
        DeviceProfile, DeviceTier, MemoryPressureLevel, PerformanceMetrics, PlatformSignals,
        Priority, ResourceId, ResourceState, TelemetryEvent,
    };
    pub use pulse_infra::{StaticSignalSource, SysinfoSignalSource};
}
