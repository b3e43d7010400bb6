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

//! The bounded telemetry channel.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use pulse_core::TelemetryEvent;

/// Publishing side of the telemetry channel.
///
/// Publishing never blocks: when the channel is full the event is dropped.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: Sender<TelemetryEvent>,
}

impl EventBus {
    /// Creates a bus and its receiving end.
    pub fn bounded(capacity: usize) -> (Self, Receiver<TelemetryEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Publishes an event, dropping it if nobody keeps up.
    pub fn publish(&self, event: TelemetryEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                log::trace!("Telemetry channel full, dropped {event:?}");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::ResourceId;

    #[test]
    fn test_full_channel_drops_instead_of_blocking() {
        let (bus, rx) = EventBus::bounded(1);
        bus.publish(TelemetryEvent::LoadStarted(ResourceId::new("a")));
        bus.publish(TelemetryEvent::LoadStarted(ResourceId::new("b")));
        assert_eq!(rx.len(), 1);
        assert!(matches!(rx.try_recv(), Ok(TelemetryEvent::LoadStarted(id)) if id.as_str() == "a"));
    }

    #[test]
    fn test_disconnected_receiver_is_ignored() {
        let (bus, rx) = EventBus::bounded(4);
        drop(rx);
        bus.publish(TelemetryEvent::Evicted(ResourceId::new("a")));
    }
}
