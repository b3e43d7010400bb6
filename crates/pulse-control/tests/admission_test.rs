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

use proptest::prelude::*;
use pulse_control::{AdmissionController, CapabilityDetector};
use pulse_core::{ConnectionType, PlatformSignals, Priority, ResourceId, SignalSource};
use std::sync::Arc;

struct FixedSource(PlatformSignals);

impl SignalSource for FixedSource {
    fn read(&self) -> Option<PlatformSignals> {
        Some(self.0.clone())
    }
}

fn controller_for(signals: PlatformSignals) -> AdmissionController {
    let detector = CapabilityDetector::new(Arc::new(FixedSource(signals)));
    AdmissionController::from_profile(&detector.detect())
}

#[test]
fn test_low_memory_mobile_admits_one_scene() {
    // --- 1. ARRANGE ---
    let ctrl = controller_for(PlatformSignals {
        user_agent: "Mozilla/5.0 (Linux; Android 13; Pixel 6a)".into(),
        viewport_width: 412,
        device_memory_gb: Some(3.0),
        ..Default::default()
    });
    let x = ResourceId::new("X");
    let y = ResourceId::new("Y");
    assert_eq!(ctrl.capacity(), 1, "A 3GB mobile device gets a single slot");

    // --- 2. ACT ---
    let first = ctrl.can_load(&x, Priority::Normal);
    ctrl.register(&x);
    let blocked = ctrl.can_load(&y, Priority::Normal);
    ctrl.unregister(&x);
    let retried = ctrl.can_load(&y, Priority::Normal);

    // --- 3. ASSERT ---
    assert!(first.can_load_more);
    assert!(!blocked.can_load_more);
    assert_eq!(blocked.reason.as_deref(), Some("at capacity"));
    assert!(retried.can_load_more, "Y is admitted once X releases its slot");
}

#[test]
fn test_desktop_with_eight_gigabytes_admits_four() {
    // --- 1. ARRANGE ---
    let ctrl = controller_for(PlatformSignals {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into(),
        viewport_width: 1920,
        device_memory_gb: Some(8.0),
        connection: ConnectionType::FourG,
        ..Default::default()
    });

    // --- 2. ACT ---
    let admitted: Vec<bool> = (0..4)
        .map(|i| {
            let id = ResourceId::new(format!("scene-{i}"));
            let ok = ctrl.can_load(&id, Priority::Normal).can_load_more;
            if ok {
                ctrl.register(&id);
            }
            ok
        })
        .collect();
    let fifth = ctrl.can_load(&ResourceId::new("scene-4"), Priority::Normal);

    // --- 3. ASSERT ---
    assert_eq!(admitted, vec![true; 4]);
    assert!(!fifth.can_load_more);
    assert_eq!(fifth.active_count, 4);
    assert_eq!(fifth.capacity, 4);
}

#[test]
fn test_critical_load_may_exceed_capacity() {
    let ctrl = AdmissionController::new(1);
    ctrl.register(&ResourceId::new("a"));
    let hero = ResourceId::new("hero");
    assert!(ctrl.can_load(&hero, Priority::Critical).can_load_more);
    ctrl.register(&hero);
    assert_eq!(ctrl.active_count(), 2, "Critical admissions transiently exceed the cap");
}

fn arb_signals() -> impl Strategy<Value = PlatformSignals> {
    (
        prop_oneof![
            Just("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)".to_string()),
            Just("Mozilla/5.0 (Linux; Android 14)".to_string()),
            Just("Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0)".to_string()),
            "[a-zA-Z ]{0,24}",
        ],
        0u32..4000,
        prop::option::of(0.25f32..64.0),
        prop::option::of(1u32..64),
        prop_oneof![
            Just(ConnectionType::Slow2g),
            Just(ConnectionType::TwoG),
            Just(ConnectionType::ThreeG),
            Just(ConnectionType::FourG),
            Just(ConnectionType::Unknown),
        ],
    )
        .prop_map(|(user_agent, viewport_width, device_memory_gb, cores, connection)| {
            PlatformSignals {
                user_agent,
                viewport_width,
                device_memory_gb,
                cores,
                connection,
                ..Default::default()
            }
        })
}

fn arb_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]", 0..12)
}

proptest! {
    #[test]
    fn prop_capacity_is_bounded_and_deterministic(signals in arb_signals()) {
        let a = pulse_core::DeviceProfile::from_signals(&signals);
        let b = pulse_core::DeviceProfile::from_signals(&signals);
        prop_assert!((1..=4).contains(&a.max_concurrent_scenes));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_critical_is_always_admitted(capacity in 0usize..5, ids in arb_ids()) {
        let ctrl = AdmissionController::new(capacity);
        for id in &ids {
            ctrl.register(&ResourceId::new(id));
        }
        let status = ctrl.can_load(&ResourceId::new("critical"), Priority::Critical);
        prop_assert!(status.can_load_more);
    }

    #[test]
    fn prop_register_twice_is_idempotent(ids in arb_ids(), extra in "[a-z]{1,3}") {
        let ctrl = AdmissionController::new(8);
        for id in &ids {
            ctrl.register(&ResourceId::new(id));
        }
        let extra = ResourceId::new(extra);
        ctrl.register(&extra);
        let once = ctrl.active_count();
        ctrl.register(&extra);
        prop_assert_eq!(ctrl.active_count(), once);
    }

    #[test]
    fn prop_register_unregister_round_trip(ids in arb_ids()) {
        let ctrl = AdmissionController::new(8);
        for id in &ids {
            ctrl.register(&ResourceId::new(id));
        }
        let before = ctrl.active_count();
        let fresh = ResourceId::new("fresh-id");
        ctrl.register(&fresh);
        ctrl.unregister(&fresh);
        prop_assert_eq!(ctrl.active_count(), before);
    }

    #[test]
    fn prop_make_room_spares_critical_ids(ids in arb_ids(), critical in arb_ids()) {
        let ctrl = AdmissionController::new(8);
        for id in &ids {
            ctrl.register(&ResourceId::new(id));
        }
        let critical: Vec<ResourceId> = critical.iter().map(ResourceId::new).collect();
        let before = ctrl.active_ids();
        let all_critical = before.iter().all(|id| critical.contains(id));

        let evicted = ctrl.make_room(&critical);

        prop_assert_eq!(evicted, !all_critical);
        for id in &before {
            if critical.contains(id) {
                prop_assert!(ctrl.is_active(id), "critical id {} was evicted", id);
            }
        }
        if evicted {
            prop_assert_eq!(ctrl.active_count(), before.len() - 1);
        }
    }
}
