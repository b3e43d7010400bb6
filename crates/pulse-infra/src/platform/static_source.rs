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

use pulse_core::{PlatformSignals, SignalSource};

/// Replays a fixed snapshot of host signals.
///
/// [`StaticSignalSource::unavailable`] models a runtime without host globals,
/// such as server-side evaluation.
#[derive(Debug, Clone, Default)]
pub struct StaticSignalSource {
    signals: Option<PlatformSignals>,
}

impl StaticSignalSource {
    /// A source that always returns `signals`.
    pub fn new(signals: PlatformSignals) -> Self {
        Self {
            signals: Some(signals),
        }
    }

    /// A source that never has anything to report.
    pub fn unavailable() -> Self {
        Self { signals: None }
    }
}

impl SignalSource for StaticSignalSource {
    fn read(&self) -> Option<PlatformSignals> {
        self.signals.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_source() {
        let signals = PlatformSignals {
            viewport_width: 390,
            ..Default::default()
        };
        assert_eq!(StaticSignalSource::new(signals.clone()).read(), Some(signals));
        assert_eq!(StaticSignalSource::unavailable().read(), None);
    }
}
