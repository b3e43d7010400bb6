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

//! Admission control for heavy GPU-backed resources.

use pulse_core::{AdmissionStatus, DeviceProfile, Priority, ResourceId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Reason attached to a capacity rejection.
pub const REASON_AT_CAPACITY: &str = "at capacity";
/// Reason attached to an admission granted because of critical priority.
pub const REASON_CRITICAL: &str = "critical";
/// Reason attached to an admission granted because the id is already active.
pub const REASON_ALREADY_ACTIVE: &str = "already active";

/// A point-in-time view of the controller's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityStatus {
    /// Number of active resources.
    pub active: usize,
    /// The session capacity.
    pub capacity: usize,
    /// Free slots. Zero when critical loads pushed past the cap.
    pub available: usize,
}

/// Proof of one particular registration.
///
/// An id can be evicted and registered again; the token tells the two
/// registrations apart so a stale owner never frees a newer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotToken(u64);

#[derive(Debug)]
struct Slot {
    id: ResourceId,
    token: SlotToken,
    // Only constructed resources may be pushed out by `make_room`.
    evictable: bool,
}

#[derive(Debug, Default)]
struct Slots {
    // Insertion order is eviction order.
    entries: Vec<Slot>,
    next_token: u64,
}

impl Slots {
    fn position(&self, id: &ResourceId) -> Option<usize> {
        self.entries.iter().position(|slot| &slot.id == id)
    }

    fn insert(&mut self, id: &ResourceId, evictable: bool) -> Option<SlotToken> {
        if self.position(id).is_some() {
            return None;
        }
        let token = SlotToken(self.next_token);
        self.next_token += 1;
        self.entries.push(Slot {
            id: id.clone(),
            token,
            evictable,
        });
        Some(token)
    }
}

/// Tracks active heavy resources and answers admit/reject queries.
///
/// A cheap, cloneable handle; every clone sees the same active set. The
/// capacity is fixed at construction from the device class and is never
/// re-derived from live frame metrics.
///
/// Every successful [`register`](Self::register) must eventually be paired
/// with exactly one [`unregister`](Self::unregister). The controller cannot
/// detect a leaked slot.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    slots: Arc<Mutex<Slots>>,
    capacity: usize,
}

impl AdmissionController {
    /// Creates a controller with a fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots::default())),
            capacity,
        }
    }

    /// Creates a controller sized for a device.
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        Self::new(profile.max_concurrent_scenes as usize)
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answers whether `id` may start loading.
    ///
    /// Critical priority and already-active ids are always admitted; anything
    /// else is rejected once the active set reaches capacity.
    pub fn can_load(&self, id: &ResourceId, priority: Priority) -> AdmissionStatus {
        let slots = self.lock();
        let active_count = slots.entries.len();
        let (can_load_more, reason) = if priority.is_critical() {
            (true, Some(REASON_CRITICAL))
        } else if slots.position(id).is_some() {
            (true, Some(REASON_ALREADY_ACTIVE))
        } else if active_count >= self.capacity {
            (false, Some(REASON_AT_CAPACITY))
        } else {
            (true, None)
        };
        drop(slots);

        if !can_load_more {
            log::debug!(
                "Rejected '{id}' ({active_count}/{} active)",
                self.capacity
            );
        }
        AdmissionStatus {
            can_load_more,
            active_count,
            capacity: self.capacity,
            reason: reason.map(str::to_owned),
        }
    }

    /// Adds an already-live `id` to the active set. Returns `false` if it was
    /// already there.
    pub fn register(&self, id: &ResourceId) -> bool {
        let mut slots = self.lock();
        let added = slots.insert(id, true).is_some();
        if added {
            log::debug!("Registered '{id}' ({}/{} active)", slots.entries.len(), self.capacity);
        }
        added
    }

    /// Holds a slot for `id` while it waits for and goes through construction.
    ///
    /// The slot counts against capacity but cannot be evicted until
    /// [`mark_ready`](Self::mark_ready). Returns `None` if `id` already holds
    /// a slot.
    pub fn reserve(&self, id: &ResourceId) -> Option<SlotToken> {
        let mut slots = self.lock();
        let token = slots.insert(id, false)?;
        log::debug!("Reserved '{id}' ({}/{} active)", slots.entries.len(), self.capacity);
        Some(token)
    }

    /// Marks a reserved slot as constructed, making it evictable. Returns
    /// `false` if the slot is no longer held.
    pub fn mark_ready(&self, token: SlotToken) -> bool {
        let mut slots = self.lock();
        match slots.entries.iter_mut().find(|slot| slot.token == token) {
            Some(slot) => {
                slot.evictable = true;
                true
            }
            None => false,
        }
    }

    /// Whether the registration behind `token` still holds its slot.
    pub fn is_held(&self, token: SlotToken) -> bool {
        self.lock().entries.iter().any(|slot| slot.token == token)
    }

    /// Frees the slot behind `token`. Returns `false` if it was already gone,
    /// e.g. evicted, in which case nothing else is touched.
    pub fn release(&self, token: SlotToken) -> bool {
        let mut slots = self.lock();
        let Some(pos) = slots.entries.iter().position(|slot| slot.token == token) else {
            return false;
        };
        let slot = slots.entries.remove(pos);
        log::debug!(
            "Released '{}' ({}/{} active)",
            slot.id,
            slots.entries.len(),
            self.capacity
        );
        true
    }

    /// Removes `id` from the active set. Returns `false` if it was absent.
    pub fn unregister(&self, id: &ResourceId) -> bool {
        let mut slots = self.lock();
        let Some(pos) = slots.position(id) else {
            return false;
        };
        slots.entries.remove(pos);
        log::debug!("Unregistered '{id}' ({}/{} active)", slots.entries.len(), self.capacity);
        true
    }

    /// Evicts the oldest constructed id not listed in `critical_ids`.
    ///
    /// Slots still waiting on construction are never evicted. Returns whether
    /// an eviction occurred.
    pub fn make_room(&self, critical_ids: &[ResourceId]) -> bool {
        self.evict_oldest(critical_ids).is_some()
    }

    /// Like [`make_room`](Self::make_room), but returns the evicted id.
    pub fn evict_oldest(&self, critical_ids: &[ResourceId]) -> Option<ResourceId> {
        let mut slots = self.lock();
        let pos = slots
            .entries
            .iter()
            .position(|slot| slot.evictable && !critical_ids.contains(&slot.id))?;
        let evicted = slots.entries.remove(pos).id;
        log::info!(
            "Evicted '{evicted}' to make room ({}/{} active)",
            slots.entries.len(),
            self.capacity
        );
        Some(evicted)
    }

    /// Current occupancy.
    pub fn status(&self) -> CapacityStatus {
        let active = self.active_count();
        CapacityStatus {
            active,
            capacity: self.capacity,
            available: self.capacity.saturating_sub(active),
        }
    }

    /// Active ids, oldest first.
    pub fn active_ids(&self) -> Vec<ResourceId> {
        self.lock().entries.iter().map(|slot| slot.id.clone()).collect()
    }

    /// Number of active resources.
    pub fn active_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether `id` is active.
    pub fn is_active(&self, id: &ResourceId) -> bool {
        self.lock().position(id).is_some()
    }

    /// The session capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clears the active set.
    pub fn reset(&self) {
        let mut slots = self.lock();
        if !slots.entries.is_empty() {
            log::debug!("Resetting admission controller ({} active)", slots.entries.len());
        }
        slots.entries.clear();
    }
}
