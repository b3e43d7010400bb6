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

//! Orchestrates admission and construction for a single heavy resource.
//!
//! A [`SceneGate`] walks a resource through its lifecycle:
//! `Queued -> Admitted -> Loading -> Active`, with `Released` reachable from
//! every state and `Evicted` only through
//! [`PerformanceRuntime::make_room`](crate::PerformanceRuntime::make_room).
//!
//! The slot is reserved at admission time, before the construction is queued,
//! so requests admitted in the same turn cannot jointly exceed capacity while
//! they wait. A reserved slot only becomes evictable once its construction
//! succeeds, and each lease frees only its own registration. The returned [`SceneRequest`] is a lease: dropping it releases
//! the slot, immediately when the construction is queued or active, or on
//! resolution when it is already in flight.

use crate::events::EventBus;
use pulse_control::{
    AdmissionController, CancelOutcome, CrashShield, LoadOutcome, LoadTicket, PressureContext,
    SlotToken,
};
use pulse_core::{
    AdmissionStatus, Priority, ResourceHandle, ResourceId, ResourceState, TelemetryEvent,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// The answer to [`SceneGate::request`].
#[derive(Debug)]
pub enum GateDecision {
    /// Admitted and queued for construction.
    Queued(SceneRequest),
    /// Not admitted; the status says why. Retry once a slot frees.
    Rejected(AdmissionStatus),
    /// Skipped under memory pressure; render a static fallback.
    Fallback,
}

impl GateDecision {
    /// Returns the lease if the request was queued.
    pub fn into_request(self) -> Option<SceneRequest> {
        match self {
            GateDecision::Queued(request) => Some(request),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Lease {
    handle: ResourceHandle,
    // `None` when another lease already held the id's slot.
    slot: Option<SlotToken>,
    dropped: bool,
}

impl Lease {
    fn free_slot(&self, admission: &AdmissionController) -> bool {
        self.slot.is_some_and(|token| admission.release(token))
    }

    fn holds_slot(&self, admission: &AdmissionController) -> bool {
        match self.slot {
            Some(token) => admission.is_held(token),
            None => admission.is_active(&self.handle.id),
        }
    }
}

fn lock(lease: &Mutex<Lease>) -> MutexGuard<'_, Lease> {
    lease.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Entry point for components that want a heavy resource.
#[derive(Debug, Clone)]
pub struct SceneGate {
    admission: AdmissionController,
    shield: CrashShield,
    pressure: Arc<RwLock<PressureContext>>,
    events: EventBus,
}

impl SceneGate {
    pub(crate) fn new(
        admission: AdmissionController,
        shield: CrashShield,
        pressure: Arc<RwLock<PressureContext>>,
        events: EventBus,
    ) -> Self {
        Self {
            admission,
            shield,
            pressure,
            events,
        }
    }

    /// Asks to load `id`.
    ///
    /// `on_ready` fires once with the construction outcome, unless the
    /// returned lease is dropped first.
    pub fn request(
        &self,
        id: impl Into<ResourceId>,
        priority: Priority,
        on_ready: impl FnOnce(LoadOutcome) + Send + 'static,
    ) -> GateDecision {
        let id = id.into();

        let pressure = *self.pressure.read().unwrap_or_else(PoisonError::into_inner);
        if pressure.should_defer(priority) {
            log::info!("Memory pressure is critical, '{id}' falls back to a static asset");
            return GateDecision::Fallback;
        }

        let status = self.admission.can_load(&id, priority);
        self.events.publish(TelemetryEvent::Admission {
            id: id.clone(),
            status: status.clone(),
        });
        if !status.can_load_more {
            return GateDecision::Rejected(status);
        }

        let slot = self.admission.reserve(&id);
        let mut handle = ResourceHandle::new(id.clone(), priority);
        handle.transition(ResourceState::Admitted);
        let lease = Arc::new(Mutex::new(Lease {
            handle,
            slot,
            dropped: false,
        }));

        let ticket = self.shield.queue_load(id.clone(), priority, {
            let lease = lease.clone();
            let admission = self.admission.clone();
            let events = self.events.clone();
            move |outcome| resolve(&lease, &admission, &events, outcome, on_ready)
        });

        GateDecision::Queued(SceneRequest {
            id,
            lease,
            ticket,
            admission: self.admission.clone(),
        })
    }
}

/// Runs when the shield reports the construction outcome.
fn resolve(
    lease: &Mutex<Lease>,
    admission: &AdmissionController,
    events: &EventBus,
    outcome: LoadOutcome,
    on_ready: impl FnOnce(LoadOutcome),
) {
    let notify = {
        let mut lease = lock(lease);
        let id = lease.handle.id.clone();
        events.publish(TelemetryEvent::LoadFinished {
            id: id.clone(),
            success: outcome.is_ready(),
        });
        lease.handle.transition(ResourceState::Loading);

        if lease.dropped {
            // Owner went away mid-flight; the slot is reclaimed now.
            lease.free_slot(admission);
            lease.handle.transition(ResourceState::Released);
            false
        } else if outcome.is_ready() {
            if let Some(token) = lease.slot {
                admission.mark_ready(token);
            }
            lease.handle.transition(ResourceState::Active);
            true
        } else {
            lease.handle.transition(ResourceState::Released);
            lease.free_slot(admission);
            true
        }
    };
    if notify {
        on_ready(outcome);
    }
}

/// A lease on an admitted resource.
///
/// Dropping it is the unmount signal.
#[derive(Debug)]
pub struct SceneRequest {
    id: ResourceId,
    lease: Arc<Mutex<Lease>>,
    ticket: LoadTicket,
    admission: AdmissionController,
}

impl SceneRequest {
    /// The resource id.
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// The current lifecycle state.
    pub fn state(&self) -> ResourceState {
        let (state, held) = {
            let lease = lock(&self.lease);
            (lease.handle.state, lease.holds_slot(&self.admission))
        };
        match state {
            ResourceState::Admitted if self.ticket.is_in_flight() => ResourceState::Loading,
            ResourceState::Active if !held => ResourceState::Evicted,
            other => other,
        }
    }

    /// Whether the resource is constructed and still holds its slot.
    pub fn is_active(&self) -> bool {
        self.state() == ResourceState::Active
    }

    /// Releases the lease now. Same as dropping it.
    pub fn release(self) {}

    fn release_inner(&mut self) {
        let mut lease = lock(&self.lease);
        if lease.dropped {
            return;
        }
        lease.dropped = true;

        let state = lease.handle.state;
        let free_now = match self.ticket.cancel() {
            CancelOutcome::Removed => true,
            // Reclaimed when the construction resolves.
            CancelOutcome::InFlight => false,
            CancelOutcome::Finished if state == ResourceState::Active => {
                if lease.holds_slot(&self.admission) {
                    true
                } else {
                    lease.handle.transition(ResourceState::Evicted);
                    false
                }
            }
            CancelOutcome::Finished => false,
        };
        if free_now {
            lease.handle.transition(ResourceState::Released);
            if lease.free_slot(&self.admission) {
                log::debug!("Released '{}' on unmount", self.id);
            }
        }
    }
}

impl Drop for SceneRequest {
    fn drop(&mut self) {
        self.release_inner();
    }
}
