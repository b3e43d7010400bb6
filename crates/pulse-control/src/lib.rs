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

//! Admission and construction control for heavy GPU-backed resources.
//!
//! The [`CapabilityDetector`] classifies the device once, the
//! [`AdmissionController`] decides *whether* a resource may load, and the
//! [`CrashShield`] decides *when*, one construction at a time.

#![warn(missing_docs)]

pub mod admission;
pub mod capability;
pub mod context;
pub mod shield;

pub use admission::{AdmissionController, CapacityStatus, SlotToken};
pub use capability::CapabilityDetector;
pub use context::PressureContext;
pub use shield::{
    CancelOutcome, ConstructionCompletion, ConstructionError, CrashShield, LoadCallback,
    LoadOutcome, LoadTicket, SceneConstructor,
};
