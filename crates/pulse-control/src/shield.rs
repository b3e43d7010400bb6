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

//! Serializes the construction of GPU-backed resources.
//!
//! Creating several GPU contexts at once is the main cause of renderer crashes
//! on constrained hardware. The [`CrashShield`] runs constructions one at a
//! time, strictly in arrival order. It does not decide *whether* a resource
//! may load; that is the [`AdmissionController`](crate::AdmissionController)'s
//! job, and callers must have been admitted before queueing.
//!
//! Construction is callback driven. A [`SceneConstructor`] receives a one-shot
//! [`ConstructionCompletion`] and resolves it whenever the renderer is done,
//! synchronously or later. The shield never holds its lock while calling out,
//! so constructors and completion callbacks may re-enter it freely.

use pulse_core::{Priority, ResourceId};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use thiserror::Error;

/// Why a construction did not produce a resource.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConstructionError {
    /// The renderer reported a failure.
    #[error("renderer failed to construct the resource: {0}")]
    Renderer(String),
    /// The completion was dropped without being resolved.
    #[error("construction was dropped before it resolved")]
    Abandoned,
}

/// The result delivered to a queued item's callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The resource is constructed and live.
    Ready,
    /// The resource was not loaded.
    Failed(ConstructionError),
}

impl LoadOutcome {
    /// Returns `true` for [`LoadOutcome::Ready`].
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Callback fired once when a started construction resolves.
pub type LoadCallback = Box<dyn FnOnce(LoadOutcome) + Send>;

/// The renderer-side construction contract.
pub trait SceneConstructor: Send + Sync {
    /// Begins constructing `id`.
    ///
    /// Implementations must eventually resolve `completion`, either before
    /// returning or later from any thread. Dropping it unresolved counts as a
    /// failure.
    fn construct(&self, id: &ResourceId, completion: ConstructionCompletion);
}

/// Result of [`LoadTicket::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The item was still queued and is gone; its callback will never fire.
    Removed,
    /// Construction already started; the callback will still fire.
    InFlight,
    /// The construction already resolved.
    Finished,
}

struct Pending {
    seq: u64,
    id: ResourceId,
    priority: Priority,
    on_ready: LoadCallback,
}

struct InFlight {
    seq: u64,
    id: ResourceId,
    on_ready: LoadCallback,
}

#[derive(Default)]
struct ShieldState {
    queue: VecDeque<Pending>,
    in_flight: Option<InFlight>,
    next_seq: u64,
    pumping: bool,
}

struct Shared {
    state: Mutex<ShieldState>,
    constructor: Arc<dyn SceneConstructor>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ShieldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts queued constructions until one is left pending.
    ///
    /// Only one pump loop runs at a time; nested calls (from a constructor that
    /// resolves synchronously) return at once and the outer loop picks up.
    fn pump(self: &Arc<Self>) {
        {
            let mut state = self.lock();
            if state.pumping {
                return;
            }
            state.pumping = true;
        }

        loop {
            let (seq, id, priority) = {
                let mut state = self.lock();
                if state.in_flight.is_some() {
                    state.pumping = false;
                    return;
                }
                let Some(next) = state.queue.pop_front() else {
                    state.pumping = false;
                    return;
                };
                state.in_flight = Some(InFlight {
                    seq: next.seq,
                    id: next.id.clone(),
                    on_ready: next.on_ready,
                });
                (next.seq, next.id, next.priority)
            };

            log::debug!("Starting construction of '{id}' ({priority:?})");
            let completion = ConstructionCompletion {
                shared: Arc::downgrade(self),
                seq,
                resolved: false,
            };
            self.constructor.construct(&id, completion);
        }
    }

    fn complete(self: &Arc<Self>, seq: u64, outcome: LoadOutcome) {
        let finished = {
            let mut state = self.lock();
            if state.in_flight.as_ref().is_some_and(|f| f.seq == seq) {
                state.in_flight.take()
            } else {
                None
            }
        };
        let Some(finished) = finished else {
            log::warn!("Ignoring completion #{seq}, it is not the construction in flight");
            return;
        };

        match &outcome {
            LoadOutcome::Ready => log::debug!("Constructed '{}'", finished.id),
            LoadOutcome::Failed(e) => log::warn!("Construction of '{}' failed: {e}", finished.id),
        }
        (finished.on_ready)(outcome);
        self.pump();
    }
}

/// One-shot handle a [`SceneConstructor`] resolves when construction ends.
#[must_use = "dropping a completion unresolved fails the construction"]
pub struct ConstructionCompletion {
    shared: Weak<Shared>,
    seq: u64,
    resolved: bool,
}

impl ConstructionCompletion {
    /// Reports a successful construction.
    pub fn succeed(mut self) {
        self.resolve(LoadOutcome::Ready);
    }

    /// Reports a failed construction.
    pub fn fail(mut self, error: ConstructionError) {
        self.resolve(LoadOutcome::Failed(error));
    }

    fn resolve(&mut self, outcome: LoadOutcome) {
        if std::mem::replace(&mut self.resolved, true) {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.complete(self.seq, outcome);
        }
    }
}

impl Drop for ConstructionCompletion {
    fn drop(&mut self) {
        if !self.resolved {
            self.resolve(LoadOutcome::Failed(ConstructionError::Abandoned));
        }
    }
}

impl std::fmt::Debug for ConstructionCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructionCompletion")
            .field("seq", &self.seq)
            .field("resolved", &self.resolved)
            .finish()
    }
}

/// Handle to a queued load, used to cancel it.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    shared: Weak<Shared>,
    seq: u64,
    id: ResourceId,
}

impl LoadTicket {
    /// The resource this ticket is for.
    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    /// Whether this load's construction is currently running.
    pub fn is_in_flight(&self) -> bool {
        let Some(shared) = self.shared.upgrade() else {
            return false;
        };
        let state = shared.lock();
        state
            .in_flight
            .as_ref()
            .is_some_and(|current| current.seq == self.seq)
    }

    /// Withdraws the load.
    ///
    /// A queued item is removed without side effects. A started construction
    /// cannot be aborted; its callback will still fire.
    pub fn cancel(&self) -> CancelOutcome {
        let Some(shared) = self.shared.upgrade() else {
            return CancelOutcome::Finished;
        };
        let mut state = shared.lock();
        if let Some(pos) = state.queue.iter().position(|p| p.seq == self.seq) {
            let removed = state.queue.remove(pos);
            drop(state);
            drop(removed);
            log::debug!("Cancelled queued load of '{}'", self.id);
            return CancelOutcome::Removed;
        }
        match state.in_flight.as_ref() {
            Some(current) if current.seq == self.seq => CancelOutcome::InFlight,
            _ => CancelOutcome::Finished,
        }
    }
}

/// FIFO construction queue with at most one construction in flight.
///
/// A cheap, cloneable handle; every clone drives the same queue.
#[derive(Clone)]
pub struct CrashShield {
    shared: Arc<Shared>,
}

impl CrashShield {
    /// Creates a shield in front of `constructor`.
    pub fn new(constructor: Arc<dyn SceneConstructor>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ShieldState::default()),
                constructor,
            }),
        }
    }

    /// Queues the construction of `id`.
    ///
    /// `on_ready` fires exactly once, when the construction resolves, unless
    /// the ticket is cancelled while the item is still queued.
    pub fn queue_load(
        &self,
        id: ResourceId,
        priority: Priority,
        on_ready: impl FnOnce(LoadOutcome) + Send + 'static,
    ) -> LoadTicket {
        let seq = {
            let mut state = self.shared.lock();
            let seq = state.next_seq;
            state.next_seq += 1;
            state.queue.push_back(Pending {
                seq,
                id: id.clone(),
                priority,
                on_ready: Box::new(on_ready),
            });
            log::debug!("Queued '{id}' ({} waiting)", state.queue.len());
            seq
        };
        let ticket = LoadTicket {
            shared: Arc::downgrade(&self.shared),
            seq,
            id,
        };
        self.shared.pump();
        ticket
    }

    /// Number of items waiting for their turn.
    pub fn queued_len(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// The resource currently being constructed.
    pub fn in_flight(&self) -> Option<ResourceId> {
        self.shared.lock().in_flight.as_ref().map(|f| f.id.clone())
    }

    /// Whether nothing is queued or in flight.
    pub fn is_idle(&self) -> bool {
        let state = self.shared.lock();
        state.queue.is_empty() && state.in_flight.is_none()
    }
}

impl std::fmt::Debug for CrashShield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("CrashShield")
            .field("queued", &state.queue.len())
            .field("in_flight", &state.in_flight.as_ref().map(|i| &i.id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Resolves every construction before returning.
    struct ImmediateConstructor {
        fail: bool,
    }

    impl SceneConstructor for ImmediateConstructor {
        fn construct(&self, id: &ResourceId, completion: ConstructionCompletion) {
            if self.fail {
                completion.fail(ConstructionError::Renderer(format!("no context for {id}")));
            } else {
                completion.succeed();
            }
        }
    }

    /// Never resolves; parks completions for the test.
    #[derive(Default)]
    struct ParkingConstructor {
        parked: Mutex<Vec<ConstructionCompletion>>,
    }

    impl SceneConstructor for ParkingConstructor {
        fn construct(&self, _id: &ResourceId, completion: ConstructionCompletion) {
            self.parked.lock().unwrap().push(completion);
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<(String, bool)>>>, impl Fn(&str) -> LoadCallback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &str| -> LoadCallback {
            let sink = sink.clone();
            let name = name.to_string();
            Box::new(move |outcome: LoadOutcome| {
                sink.lock().unwrap().push((name, outcome.is_ready()));
            })
        };
        (log, make)
    }

    #[test]
    fn test_synchronous_constructor_drains_in_order() {
        let shield = CrashShield::new(Arc::new(ImmediateConstructor { fail: false }));
        let (log, make) = recorder();
        for name in ["a", "b", "c"] {
            shield.queue_load(ResourceId::new(name), Priority::Normal, make(name));
        }
        let log = log.lock().unwrap();
        assert_eq!(
            *log,
            vec![("a".into(), true), ("b".into(), true), ("c".into(), true)]
        );
        assert!(shield.is_idle());
    }

    #[test]
    fn test_failure_is_reported_and_queue_continues() {
        let shield = CrashShield::new(Arc::new(ImmediateConstructor { fail: true }));
        let (log, make) = recorder();
        shield.queue_load(ResourceId::new("a"), Priority::Normal, make("a"));
        shield.queue_load(ResourceId::new("b"), Priority::Normal, make("b"));
        assert_eq!(
            *log.lock().unwrap(),
            vec![("a".into(), false), ("b".into(), false)]
        );
    }

    #[test]
    fn test_cancel_queued_and_in_flight() {
        let constructor = Arc::new(ParkingConstructor::default());
        let shield = CrashShield::new(constructor.clone());
        let (log, make) = recorder();

        let first = shield.queue_load(ResourceId::new("a"), Priority::Normal, make("a"));
        let second = shield.queue_load(ResourceId::new("b"), Priority::Normal, make("b"));
        assert_eq!(shield.in_flight(), Some(ResourceId::new("a")));
        assert_eq!(shield.queued_len(), 1);
        assert!(first.is_in_flight());
        assert!(!second.is_in_flight());

        assert_eq!(second.cancel(), CancelOutcome::Removed);
        assert_eq!(first.cancel(), CancelOutcome::InFlight);
        assert_eq!(shield.queued_len(), 0);

        let completion = constructor.parked.lock().unwrap().pop().unwrap();
        completion.succeed();
        assert_eq!(*log.lock().unwrap(), vec![("a".into(), true)]);
        assert_eq!(first.cancel(), CancelOutcome::Finished);
        assert!(shield.is_idle());
    }

    #[test]
    fn test_dropped_completion_counts_as_failure() {
        let constructor = Arc::new(ParkingConstructor::default());
        let shield = CrashShield::new(constructor.clone());
        let (log, make) = recorder();
        shield.queue_load(ResourceId::new("a"), Priority::Normal, make("a"));

        let completion = constructor.parked.lock().unwrap().pop().unwrap();
        drop(completion);
        assert_eq!(*log.lock().unwrap(), vec![("a".into(), false)]);
        assert!(shield.is_idle());
    }

    #[test]
    fn test_callback_may_requeue() {
        let shield = CrashShield::new(Arc::new(ImmediateConstructor { fail: false }));
        let (log, make) = recorder();
        let inner = shield.clone();
        let retry = make("retry");
        shield.queue_load(ResourceId::new("a"), Priority::Normal, move |_| {
            inner.queue_load(ResourceId::new("retry"), Priority::Normal, retry);
        });
        assert_eq!(*log.lock().unwrap(), vec![("retry".into(), true)]);
        assert!(shield.is_idle());
    }
}
