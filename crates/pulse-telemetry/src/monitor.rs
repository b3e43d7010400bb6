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

//! Drives the samplers and recomputes metrics on a fixed cadence.

use crate::metrics::{metrics_from_average, MetricsHandle};
use crate::sampler::{PrecisionFrameSampler, RawFrameSampler};
use pulse_core::telemetry::{FreezeSignal, PerformanceMetrics};
use pulse_core::{FrameSampler, PlatformSignals};
use std::time::Duration;

/// Shortest allowed recompute interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(400);
/// Longest allowed recompute interval.
pub const MAX_INTERVAL: Duration = Duration::from_millis(500);

/// Settings of an [`FpsMonitor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsMonitorConfig {
    /// Recompute cadence. Clamped to 400..=500ms.
    pub interval: Duration,
    /// Window of the raw sampler.
    pub raw_window: usize,
    /// Raw sampler validity bound for a frame interval.
    pub max_valid_delta_ms: f64,
    /// Whether to try building the precision engine.
    pub prefer_precision: bool,
}

impl Default for FpsMonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(450),
            raw_window: crate::sampler::DEFAULT_RAW_WINDOW,
            max_valid_delta_ms: crate::sampler::DEFAULT_MAX_VALID_DELTA_MS,
            prefer_precision: true,
        }
    }
}

/// Continuous frame-rate measurement.
///
/// Every frame goes to the raw sampler and, when one was built, the preferred
/// engine. On each tick exactly one of them is authoritative: the preferred
/// engine if it holds samples, otherwise the raw sampler.
pub struct FpsMonitor {
    raw: RawFrameSampler,
    preferred: Option<Box<dyn FrameSampler>>,
    interval: Duration,
    last_tick: Duration,
    handle: MetricsHandle,
    frozen: bool,
}

impl FpsMonitor {
    /// Creates a monitor, building the precision engine from `signals` when
    /// asked to. A failed build silently leaves only the raw sampler.
    pub fn new(config: FpsMonitorConfig, signals: Option<&PlatformSignals>) -> Self {
        let preferred = match signals {
            Some(signals) if config.prefer_precision => {
                match PrecisionFrameSampler::try_new(signals) {
                    Ok(engine) => Some(Box::new(engine) as Box<dyn FrameSampler>),
                    Err(e) => {
                        log::debug!("Precision sampler unavailable ({e}), using raw sampler");
                        None
                    }
                }
            }
            _ => None,
        };
        Self::build(config, preferred)
    }

    /// Creates a monitor with an explicit preferred engine.
    pub fn with_engine(config: FpsMonitorConfig, engine: Box<dyn FrameSampler>) -> Self {
        Self::build(config, Some(engine))
    }

    fn build(config: FpsMonitorConfig, preferred: Option<Box<dyn FrameSampler>>) -> Self {
        Self {
            raw: RawFrameSampler::new(config.raw_window, config.max_valid_delta_ms),
            preferred,
            interval: config.interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
            last_tick: Duration::ZERO,
            handle: MetricsHandle::new(),
            frozen: false,
        }
    }

    /// Feeds one animation-frame callback.
    pub fn record_frame(&mut self, now: Duration) {
        self.raw.record_frame(now);
        if let Some(engine) = self.preferred.as_mut() {
            engine.record_frame(now);
        }
    }

    /// Should be called periodically (e.g., once per frame or from a timer).
    ///
    /// Recomputes metrics when the interval has passed and returns them.
    pub fn poll(&mut self, now: Duration) -> Option<PerformanceMetrics> {
        if now.saturating_sub(self.last_tick) < self.interval {
            return None;
        }
        self.last_tick = now;
        self.recompute()
    }

    /// Recomputes metrics from the authoritative sampler right away.
    ///
    /// Returns `None`, leaving the previous metrics in place, when no sampler
    /// holds a single interval yet.
    pub fn recompute(&mut self) -> Option<PerformanceMetrics> {
        let source: &dyn FrameSampler = match self.preferred.as_deref() {
            Some(engine) if engine.sample_count() > 0 => engine,
            _ => &self.raw,
        };
        let avg = source.average_delta_ms()?;
        let metrics = metrics_from_average(avg);
        log::trace!(
            "{} sampler: {} fps, jank {:.2}, {:?}",
            source.name(),
            metrics.current_fps,
            metrics.jank_score,
            metrics.device_tier
        );
        self.handle
            .publish(metrics, source.frame_stats(), source.name());
        Some(metrics)
    }

    /// Records a battery-saver advisory. Sampling continues either way.
    pub fn apply_freeze(&mut self, signal: FreezeSignal) {
        let frozen = signal == FreezeSignal::Freeze;
        if frozen != self.frozen {
            log::info!("Battery saver advisory: {signal:?}");
        }
        self.frozen = frozen;
        self.handle.set_frozen(frozen);
    }

    /// Whether the latest advisory was a freeze.
    pub fn frozen(&self) -> bool {
        self.frozen
    }

    /// The latest metrics.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.handle.latest()
    }

    /// A pull handle for consumers.
    pub fn handle(&self) -> MetricsHandle {
        self.handle.clone()
    }

    /// Whether a preferred engine was built.
    pub fn has_preferred_engine(&self) -> bool {
        self.preferred.is_some()
    }

    /// The effective recompute interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl std::fmt::Debug for FpsMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FpsMonitor")
            .field("raw_samples", &self.raw.sample_count())
            .field("preferred", &self.preferred.as_ref().map(|e| e.name()))
            .field("interval", &self.interval)
            .field("frozen", &self.frozen)
            .finish()
    }
}
