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

//! Maps a live frame rate to a [`DeviceTier`].

use pulse_core::DeviceTier;

/// Classifies a frame rate. No hysteresis; callers re-run it every tick.
pub fn classify(fps: u32) -> DeviceTier {
    match fps {
        100.. => DeviceTier::Ultra,
        70..=99 => DeviceTier::High,
        50..=69 => DeviceTier::Medium,
        35..=49 => DeviceTier::Low,
        _ => DeviceTier::Minimal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify(144), DeviceTier::Ultra);
        assert_eq!(classify(100), DeviceTier::Ultra);
        assert_eq!(classify(99), DeviceTier::High);
        assert_eq!(classify(70), DeviceTier::High);
        assert_eq!(classify(69), DeviceTier::Medium);
        assert_eq!(classify(50), DeviceTier::Medium);
        assert_eq!(classify(49), DeviceTier::Low);
        assert_eq!(classify(35), DeviceTier::Low);
        assert_eq!(classify(34), DeviceTier::Minimal);
        assert_eq!(classify(0), DeviceTier::Minimal);
    }
}
