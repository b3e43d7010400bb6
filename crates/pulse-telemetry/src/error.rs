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

//! Errors raised while building a sampler.

use thiserror::Error;

/// Failure to construct a [`FrameSampler`](pulse_core::FrameSampler).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SamplerError {
    /// The host has no high-resolution monotonic clock.
    #[error("the host does not expose a high-resolution timer")]
    NoHighResTimer,
    /// The requested window cannot hold any samples.
    #[error("invalid sampler window: {0}")]
    InvalidWindow(usize),
}
