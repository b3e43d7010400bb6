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

//! Drives a simulated page session through the performance runtime.
//!
//! Usage: `pulse-sandbox [config.json]`

use anyhow::Result;
use pulse_sdk::prelude::*;
use pulse_sdk::{init_logging, GateDecision, PerformanceRuntime, RuntimeConfig, SceneRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Pretends to create a GPU context, taking a fixed number of frames.
#[derive(Default)]
struct SimulatedRenderer {
    pending: Mutex<VecDeque<(ResourceId, ConstructionCompletion, u32)>>,
}

const BUILD_FRAMES: u32 = 20;

impl SimulatedRenderer {
    /// Advances the construction in flight by one frame.
    fn step(&self) {
        let done = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            let finished = match pending.front_mut() {
                Some((_, _, frames_left)) => {
                    *frames_left = frames_left.saturating_sub(1);
                    *frames_left == 0
                }
                None => false,
            };
            if finished {
                pending.pop_front()
            } else {
                None
            }
        };
        if let Some((id, completion, _)) = done {
            if id.as_str().starts_with("broken") {
                completion.fail(ConstructionError::Renderer("context creation failed".into()));
            } else {
                completion.succeed();
            }
        }
    }
}

impl SceneConstructor for SimulatedRenderer {
    fn construct(&self, id: &ResourceId, completion: ConstructionCompletion) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back((id.clone(), completion, BUILD_FRAMES));
    }
}

fn phone() -> PlatformSignals {
    PlatformSignals {
        user_agent: "Mozilla/5.0 (Linux; Android 14; Pixel 7)".into(),
        viewport_width: 412,
        device_memory_gb: Some(8.0),
        cores: Some(8),
        high_res_timer: true,
        ..Default::default()
    }
}

/// Requests every waiting scene, keeping rejected ones for a later retry.
fn request_waiting<'a>(
    runtime: &PerformanceRuntime,
    waiting: &mut VecDeque<(&'a str, Priority)>,
    leases: &mut Vec<SceneRequest>,
) {
    for _ in 0..waiting.len() {
        let Some((name, priority)) = waiting.pop_front() else {
            break;
        };
        let tag = name.to_string();
        match runtime.request_scene(name, priority, move |outcome| {
            log::info!("'{tag}' resolved: {outcome:?}");
        }) {
            GateDecision::Queued(request) => leases.push(request),
            GateDecision::Rejected(status) => {
                log::info!("'{name}' rejected ({:?}), will retry", status.reason);
                waiting.push_back((name, priority));
            }
            GateDecision::Fallback => log::info!("'{name}' uses a static fallback"),
        }
    }
}

fn main() -> Result<()> {
    init_logging();

    let renderer = Arc::new(SimulatedRenderer::default());
    let source = Arc::new(StaticSignalSource::new(phone()));
    let (runtime, events) = match std::env::args().nth(1) {
        Some(path) => PerformanceRuntime::from_config_file(path, source, renderer.clone())?,
        None => PerformanceRuntime::new(RuntimeConfig::default(), source, renderer.clone()),
    };
    log::info!("Profile: {:?}", runtime.profile());

    let mut leases: Vec<SceneRequest> = Vec::new();
    let mut waiting: VecDeque<(&str, Priority)> = VecDeque::from([
        ("hero", Priority::Critical),
        ("gallery", Priority::High),
        ("broken-footer", Priority::Normal),
        ("testimonials", Priority::Normal),
    ]);
    request_waiting(&runtime, &mut waiting, &mut leases);

    // Three seconds at 60Hz, then three at 30Hz.
    let mut now = Duration::ZERO;
    runtime.record_frame(now);
    for frame in 0..270u32 {
        now += if frame < 180 {
            Duration::from_micros(16_667)
        } else {
            Duration::from_micros(33_333)
        };
        runtime.record_frame(now);
        renderer.step();
        if let Some(metrics) = runtime.poll(now) {
            log::info!(
                "t={:>5}ms fps={} jank={:.2} tier={:?}",
                now.as_millis(),
                metrics.current_fps,
                metrics.jank_score,
                metrics.device_tier
            );
        }
        if frame == 90 {
            // The gallery scrolls out of view.
            leases.retain(|lease| lease.id().as_str() != "gallery");
        }
        if frame % 30 == 0 {
            leases.retain(|lease| lease.state() != ResourceState::Released);
            request_waiting(&runtime, &mut waiting, &mut leases);
        }
        if frame == 200 {
            runtime.apply_freeze(FreezeSignal::Freeze);
        }
    }

    if let Some(stats) = runtime.frame_stats() {
        log::info!(
            "p50={:.2}ms p95={:.2}ms dropped={} reliable={}",
            stats.p50_frame_ms,
            stats.p95_frame_ms,
            stats.dropped_frames,
            stats.is_reliable
        );
    }
    for lease in &leases {
        log::info!("'{}' is {:?}", lease.id(), lease.state());
    }
    drop(leases);
    log::info!("After unmount: {:?}", runtime.admission().status());

    let received = events.try_iter().count();
    log::info!("{received} telemetry events published");
    Ok(())
}
