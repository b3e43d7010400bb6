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

use pulse_control::{
    CancelOutcome, ConstructionCompletion, ConstructionError, CrashShield, LoadOutcome,
    SceneConstructor,
};
use pulse_core::{Priority, ResourceId};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An asynchronous renderer stand-in: records each construction request and
/// lets the test resolve it later, tracking how many are in flight.
#[derive(Default)]
struct DeferredConstructor {
    pending: Mutex<VecDeque<(ResourceId, ConstructionCompletion)>>,
    started: Mutex<Vec<ResourceId>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl DeferredConstructor {
    fn resolve_next(&self, success: bool) -> Option<ResourceId> {
        let (id, completion) = self.pending.lock().unwrap().pop_front()?;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if success {
            completion.succeed();
        } else {
            completion.fail(ConstructionError::Renderer("context lost".into()));
        }
        Some(id)
    }

    fn started(&self) -> Vec<ResourceId> {
        self.started.lock().unwrap().clone()
    }
}

impl SceneConstructor for DeferredConstructor {
    fn construct(&self, id: &ResourceId, completion: ConstructionCompletion) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.started.lock().unwrap().push(id.clone());
        self.pending.lock().unwrap().push_back((id.clone(), completion));
    }
}

type Fired = Arc<Mutex<Vec<(ResourceId, LoadOutcome)>>>;

fn queue(shield: &CrashShield, fired: &Fired, name: &str) -> pulse_control::LoadTicket {
    let sink = fired.clone();
    let id = ResourceId::new(name);
    let cb_id = id.clone();
    shield.queue_load(id, Priority::Normal, move |outcome| {
        sink.lock().unwrap().push((cb_id, outcome));
    })
}

#[test]
fn test_at_most_one_construction_in_fifo_order() {
    // --- 1. ARRANGE ---
    let constructor = Arc::new(DeferredConstructor::default());
    let shield = CrashShield::new(constructor.clone());
    let fired: Fired = Arc::default();
    let names: Vec<String> = (0..6).map(|i| format!("scene-{i}")).collect();

    // --- 2. ACT ---
    for name in &names {
        queue(&shield, &fired, name);
    }
    assert_eq!(shield.queued_len(), names.len() - 1);
    while constructor.resolve_next(true).is_some() {}

    // --- 3. ASSERT ---
    assert_eq!(
        constructor.peak_in_flight.load(Ordering::SeqCst),
        1,
        "Two constructions must never overlap"
    );
    let expected: Vec<ResourceId> = names.iter().map(ResourceId::new).collect();
    assert_eq!(constructor.started(), expected, "Constructions start in arrival order");
    let fired = fired.lock().unwrap();
    let fired_ids: Vec<ResourceId> = fired.iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(fired_ids, expected, "Each callback fires exactly once, in order");
    assert!(fired.iter().all(|(_, outcome)| outcome.is_ready()));
    assert!(shield.is_idle());
}

#[test]
fn test_cancelled_queued_item_never_fires() {
    // --- 1. ARRANGE ---
    let constructor = Arc::new(DeferredConstructor::default());
    let shield = CrashShield::new(constructor.clone());
    let fired: Fired = Arc::default();
    queue(&shield, &fired, "a");
    let b = queue(&shield, &fired, "b");
    queue(&shield, &fired, "c");

    // --- 2. ACT ---
    let outcome = b.cancel();
    constructor.resolve_next(true);

    // --- 3. ASSERT ---
    assert_eq!(outcome, CancelOutcome::Removed);
    assert_eq!(
        shield.in_flight(),
        Some(ResourceId::new("c")),
        "The item behind the cancelled one starts as soon as 'a' resolves"
    );
    constructor.resolve_next(true);
    let fired: Vec<ResourceId> = fired.lock().unwrap().iter().map(|(id, _)| id.clone()).collect();
    assert_eq!(fired, vec![ResourceId::new("a"), ResourceId::new("c")]);
    assert_eq!(constructor.started(), vec![ResourceId::new("a"), ResourceId::new("c")]);
}

#[test]
fn test_failed_construction_advances_queue() {
    // --- 1. ARRANGE ---
    let constructor = Arc::new(DeferredConstructor::default());
    let shield = CrashShield::new(constructor.clone());
    let fired: Fired = Arc::default();
    queue(&shield, &fired, "broken");
    queue(&shield, &fired, "next");

    // --- 2. ACT ---
    constructor.resolve_next(false);

    // --- 3. ASSERT ---
    assert_eq!(shield.in_flight(), Some(ResourceId::new("next")));
    let fired = fired.lock().unwrap();
    assert!(matches!(
        fired[0].1,
        LoadOutcome::Failed(ConstructionError::Renderer(_))
    ));
}

#[test]
fn test_completion_from_another_thread() {
    let constructor = Arc::new(DeferredConstructor::default());
    let shield = CrashShield::new(constructor.clone());
    let fired: Fired = Arc::default();
    queue(&shield, &fired, "a");
    queue(&shield, &fired, "b");

    let worker = {
        let constructor = constructor.clone();
        std::thread::spawn(move || constructor.resolve_next(true))
    };
    assert_eq!(worker.join().unwrap(), Some(ResourceId::new("a")));
    assert_eq!(shield.in_flight(), Some(ResourceId::new("b")));
    constructor.resolve_next(true);
    assert_eq!(fired.lock().unwrap().len(), 2);
    assert_eq!(constructor.peak_in_flight.load(Ordering::SeqCst), 1);
}
