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

//! The session-wide performance runtime.

use crate::config::RuntimeConfig;
use crate::events::EventBus;
use crate::gate::{GateDecision, SceneGate};
use anyhow::{Context as _, Result};
use crossbeam_channel::Receiver;
use pulse_control::{
    AdmissionController, CapabilityDetector, ConstructionCompletion, CrashShield, LoadOutcome,
    PressureContext, SceneConstructor,
};
use pulse_core::telemetry::{FrameStats, FreezeSignal, RuntimeGauge};
use pulse_core::{
    DeviceProfile, MemoryPressureLevel, PerformanceMetrics, Priority, ResourceId,
    SignalSource, TelemetryEvent,
};
use pulse_telemetry::{FpsMonitor, MetricsHandle};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Publishes `LoadStarted` before handing the construction to the renderer.
struct ObservedConstructor {
    inner: Arc<dyn SceneConstructor>,
    events: EventBus,
}

impl SceneConstructor for ObservedConstructor {
    fn construct(&self, id: &ResourceId, completion: ConstructionCompletion) {
        self.events.publish(TelemetryEvent::LoadStarted(id.clone()));
        self.inner.construct(id, completion);
    }
}

/// The performance runtime for one page session.
///
/// Owns the device profile, the admission controller, the construction
/// queue and the frame monitor. It is constructed explicitly and passed to
/// whoever needs it; there is no global instance.
pub struct PerformanceRuntime {
    config: RuntimeConfig,
    detector: CapabilityDetector,
    admission: AdmissionController,
    shield: CrashShield,
    monitor: Mutex<FpsMonitor>,
    metrics: MetricsHandle,
    pressure: Arc<RwLock<PressureContext>>,
    events: EventBus,
    origin: Instant,
}

impl PerformanceRuntime {
    /// Creates a runtime and the receiving end of its telemetry channel.
    ///
    /// The device is classified here, once, and the admission capacity is
    /// fixed from that profile for the rest of the session.
    pub fn new(
        config: RuntimeConfig,
        source: Arc<dyn SignalSource>,
        constructor: Arc<dyn SceneConstructor>,
    ) -> (Self, Receiver<TelemetryEvent>) {
        let (events, rx) = EventBus::bounded(config.telemetry_buffer_size);
        let detector = CapabilityDetector::new(source);
        let profile = detector.detect();

        let monitor = FpsMonitor::new(config.monitor_config(), detector.signals());
        let metrics = monitor.handle();

        let pressure = PressureContext::default();

        let shield = CrashShield::new(Arc::new(ObservedConstructor {
            inner: constructor,
            events: events.clone(),
        }));

        log::info!(
            "Performance runtime ready: capacity {}, {} sampler",
            profile.max_concurrent_scenes,
            if monitor.has_preferred_engine() { "precision" } else { "raw" }
        );

        let runtime = Self {
            config,
            admission: AdmissionController::from_profile(&profile),
            detector,
            shield,
            monitor: Mutex::new(monitor),
            metrics,
            pressure: Arc::new(RwLock::new(pressure)),
            events,
            origin: Instant::now(),
        };
        (runtime, rx)
    }

    /// Creates a runtime from a JSON config file.
    pub fn from_config_file(
        path: impl AsRef<Path>,
        source: Arc<dyn SignalSource>,
        constructor: Arc<dyn SceneConstructor>,
    ) -> Result<(Self, Receiver<TelemetryEvent>)> {
        let path = path.as_ref();
        let config = RuntimeConfig::from_file(path)
            .with_context(|| format!("loading runtime config from {}", path.display()))?;
        Ok(Self::new(config, source, constructor))
    }

    /// The effective configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The session's device profile.
    pub fn profile(&self) -> DeviceProfile {
        self.detector.detect()
    }

    /// The admission controller shared by every gate.
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// The construction queue shared by every gate.
    pub fn shield(&self) -> &CrashShield {
        &self.shield
    }

    /// A gate handle for UI components.
    pub fn gate(&self) -> SceneGate {
        SceneGate::new(
            self.admission.clone(),
            self.shield.clone(),
            self.pressure.clone(),
            self.events.clone(),
        )
    }

    /// Shorthand for `self.gate().request(..)`.
    pub fn request_scene(
        &self,
        id: impl Into<ResourceId>,
        priority: Priority,
        on_ready: impl FnOnce(LoadOutcome) + Send + 'static,
    ) -> GateDecision {
        self.gate().request(id, priority, on_ready)
    }

    /// Evicts the oldest non-critical active resource. Returns whether one was evicted.
    pub fn make_room(&self, critical_ids: &[ResourceId]) -> bool {
        match self.admission.evict_oldest(critical_ids) {
            Some(id) => {
                self.events.publish(TelemetryEvent::Evicted(id));
                true
            }
            None => false,
        }
    }

    /// Time since the runtime was created, on the frame timeline.
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Feeds an animation-frame callback at `now` on the frame timeline.
    pub fn record_frame(&self, now: Duration) {
        self.lock_monitor().record_frame(now);
    }

    /// Feeds an animation-frame callback at the current instant.
    pub fn record_frame_now(&self) {
        self.record_frame(self.elapsed());
    }

    /// Should be called from a timer or once per frame.
    ///
    /// Recomputes and publishes metrics when the cadence has elapsed.
    pub fn poll(&self, now: Duration) -> Option<PerformanceMetrics> {
        let metrics = self.lock_monitor().poll(now)?;
        self.publish_metrics(metrics);
        Some(metrics)
    }

    /// The latest metrics. Never blocks on the sampler.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics.latest()
    }

    /// Extended statistics from the precision engine, when it is active.
    pub fn frame_stats(&self) -> Option<FrameStats> {
        self.metrics.frame_stats()
    }

    /// A pull handle to the latest metrics.
    pub fn metrics_handle(&self) -> MetricsHandle {
        self.metrics.clone()
    }

    /// Forwards a battery-saver advisory. Sampling is not affected.
    pub fn apply_freeze(&self, signal: FreezeSignal) {
        self.lock_monitor().apply_freeze(signal);
        self.write_pressure(|p| p.apply_freeze(signal));
        self.events.publish(TelemetryEvent::FreezeAdvisory(signal));
    }

    /// Updates the externally supplied memory pressure.
    pub fn set_memory_pressure(&self, level: MemoryPressureLevel) {
        log::info!("Memory pressure is now {level:?}");
        self.write_pressure(|p| p.memory_pressure = level);
    }

    /// The current pressure signals.
    pub fn pressure(&self) -> PressureContext {
        *self.pressure.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears the admission state at page teardown.
    pub fn reset(&self) {
        self.admission.reset();
    }

    fn lock_monitor(&self) -> std::sync::MutexGuard<'_, FpsMonitor> {
        self.monitor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_pressure(&self, f: impl FnOnce(&mut PressureContext)) {
        let mut pressure = self.pressure.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut pressure);
    }

    fn publish_metrics(&self, metrics: PerformanceMetrics) {
        self.events.publish(TelemetryEvent::MetricsUpdated(metrics));
        for gauge in RuntimeGauge::ALL {
            let value = match gauge {
                RuntimeGauge::CurrentFps => f64::from(metrics.current_fps),
                RuntimeGauge::JankScore => f64::from(metrics.jank_score),
                RuntimeGauge::ActiveScenes => self.admission.active_count() as f64,
                RuntimeGauge::QueuedLoads => self.shield.queued_len() as f64,
            };
            self.events.publish(TelemetryEvent::MetricUpdate { gauge, value });
        }
    }
}

impl std::fmt::Debug for PerformanceRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceRuntime")
            .field("profile", &self.detector.detect())
            .field("admission", &self.admission.status())
            .field("shield", &self.shield)
            .finish_non_exhaustive()
    }
}
