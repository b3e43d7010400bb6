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

//! Identity, priority and lifecycle of heavy GPU-backed resources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier of a heavy resource (typically an interactive scene).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a new id.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_owned())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How important a resource is to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Always admitted, may exceed the capacity cap.
    Critical,
    /// Above-the-fold content.
    High,
    /// Everything else.
    #[default]
    Normal,
}

impl Priority {
    /// Returns `true` for [`Priority::Critical`].
    pub fn is_critical(self) -> bool {
        matches!(self, Self::Critical)
    }
}

/// The lifecycle of a [`ResourceHandle`].
///
/// `Queued -> Admitted -> Loading -> Active -> (Evicted | Released)`, and any
/// state may move to `Released` when the owning component goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceState {
    /// Intent expressed, waiting for admission.
    #[default]
    Queued,
    /// Admitted, waiting for its construction turn.
    Admitted,
    /// Construction in flight.
    Loading,
    /// Constructed and live.
    Active,
    /// Owner went away. Terminal.
    Released,
    /// Pushed out to make room. Terminal.
    Evicted,
}

impl ResourceState {
    /// Returns `true` if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: ResourceState) -> bool {
        use ResourceState::*;
        match (self, next) {
            (Released | Evicted, _) => false,
            (_, Released) => true,
            (Queued, Admitted) | (Admitted, Loading) | (Loading, Active) | (Active, Evicted) => {
                true
            }
            _ => false,
        }
    }

    /// Returns `true` for states that will never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Released | Self::Evicted)
    }
}

/// A heavy resource as tracked by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHandle {
    /// The resource id.
    pub id: ResourceId,
    /// The admission priority.
    pub priority: Priority,
    /// The current lifecycle state.
    pub state: ResourceState,
}

impl ResourceHandle {
    /// Creates a handle in the `Queued` state.
    pub fn new(id: impl Into<ResourceId>, priority: Priority) -> Self {
        Self {
            id: id.into(),
            priority,
            state: ResourceState::Queued,
        }
    }

    /// Moves to `next` if the transition is legal. Returns whether it moved.
    pub fn transition(&mut self, next: ResourceState) -> bool {
        if self.state.can_transition_to(next) {
            self.state = next;
            true
        } else {
            log::trace!(
                "Ignored illegal transition {:?} -> {:?} for '{}'",
                self.state,
                next,
                self.id
            );
            false
        }
    }
}

/// How constrained the device's memory currently is.
///
/// Supplied from outside the runtime; nothing here derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryPressureLevel {
    /// No pressure.
    #[default]
    Normal,
    /// Some pressure. Informational.
    Elevated,
    /// Non-critical resources should not be constructed.
    Critical,
}

/// The answer to an admission query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionStatus {
    /// Whether the resource may load.
    pub can_load_more: bool,
    /// Number of active resources at the time of the query.
    pub active_count: usize,
    /// The session capacity.
    pub capacity: usize,
    /// Why the query was answered this way, when there is something to say.
    pub reason: Option<String>,
}
