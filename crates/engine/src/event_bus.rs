// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live event fan-out for `/events` (spec.md §4.5).
//!
//! Subscribers get a `project/list` snapshot first, then every event
//! published afterward, in publish order. The snapshot is handed back to
//! the caller directly rather than sent over the broadcast channel, so it
//! reaches only the new subscriber and never replays into already-connected
//! ones. A single mutex serializes subscribe-and-snapshot against publish
//! so the snapshot can never miss a live event published concurrently with
//! the subscribe.

use parking_lot::Mutex;
use racs_core::Event;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Ring buffer capacity per subscriber. A subscriber that falls this far
/// behind will see [`broadcast::error::RecvError::Lagged`] and should treat
/// it as "some state changes were missed, resync if you care" rather than
/// a fatal error.
const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    publish_lock: Arc<Mutex<()>>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tx,
            publish_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn publish(&self, event: Event) {
        let _guard = self.publish_lock.lock();
        // No receivers is not an error: it just means nobody is watching.
        let _ = self.tx.send(event);
    }

    /// Subscribe and compute this subscriber's snapshot atomically with
    /// respect to `publish`. `make_snapshot` runs under the publish lock so
    /// the returned snapshot and the receiver agree on exactly which
    /// published events the caller still needs to stream afterward; the
    /// snapshot is returned directly rather than broadcast, so it is never
    /// observed by any other subscriber.
    pub fn subscribe_with_snapshot<F>(&self, make_snapshot: F) -> (Event, broadcast::Receiver<Event>)
    where
        F: FnOnce() -> Event,
    {
        let _guard = self.publish_lock.lock();
        let rx = self.tx.subscribe();
        (make_snapshot(), rx)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
