//! Change broadcast for open views.
//!
//! Every write to a stock category bumps a revision and publishes a
//! [`SyncEvent`]. Subscribers refresh whatever they display; clients over HTTP
//! poll the revision instead.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// One change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEvent {
    /// Revision after the change
    pub revision: u64,
    /// What changed (a collection key, `"spare_parts"`, `"inventory"`, ...)
    pub source: String,
}

/// Shared revision counter plus broadcast channel.
///
/// Cloning is cheap; clones share the same counter and channel.
#[derive(Debug, Clone)]
pub struct SyncHub {
    revision: Arc<AtomicU64>,
    sender: broadcast::Sender<SyncEvent>,
}

impl Default for SyncHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncHub {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            revision: Arc::new(AtomicU64::new(0)),
            sender,
        }
    }

    /// Current revision; starts at 0 and only grows.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Bumps the revision and notifies subscribers.
    ///
    /// Having no subscribers is fine; the revision still advances.
    pub fn publish(&self, source: impl Into<String>) -> SyncEvent {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        let event = SyncEvent {
            revision,
            source: source.into(),
        };
        if self.sender.send(event.clone()).is_err() {
            tracing::trace!(revision, "sync event published with no subscribers");
        }
        event
    }

    /// New receiver for events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_publish_without_subscribers_advances_revision() {
        let hub = SyncHub::new();
        assert_eq!(hub.revision(), 0);
        hub.publish("toolsItems");
        hub.publish("ppeItems");
        assert_eq!(hub.revision(), 2);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events_in_order() {
        let hub = SyncHub::new();
        let mut rx = hub.subscribe();
        let clone = hub.clone();

        clone.publish("spare_parts");
        hub.publish("ppeItems");

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.source, "spare_parts");
        assert_eq!(first.revision, 1);
        assert_eq!(second.source, "ppeItems");
        assert_eq!(second.revision, 2);
        assert_eq!(clone.revision(), 2);
    }
}
