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

//! Event types published on the runtime's telemetry channel.

use crate::resource::{AdmissionStatus, ResourceId};
use crate::telemetry::metrics::RuntimeGauge;
use crate::telemetry::performance::{FreezeSignal, PerformanceMetrics};

/// An event produced by the runtime.
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    /// Frame metrics were recomputed.
    MetricsUpdated(PerformanceMetrics),
    /// An admission query was answered.
    Admission {
        /// The resource asked about.
        id: ResourceId,
        /// The answer.
        status: AdmissionStatus,
    },
    /// An active resource was evicted to make room.
    Evicted(ResourceId),
    /// A construction started.
    LoadStarted(ResourceId),
    /// A construction resolved.
    LoadFinished {
        /// The resource.
        id: ResourceId,
        /// Whether it constructed successfully.
        success: bool,
    },
    /// A battery-saver advisory was received.
    FreezeAdvisory(FreezeSignal),
    /// A gauge sampled on a metrics tick.
    MetricUpdate {
        /// Which gauge.
        gauge: RuntimeGauge,
        /// Its value at the tick.
        value: f64,
    },
}
