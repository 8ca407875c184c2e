//! In-memory feed for tests/dev.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, Subscription};
use crate::record::Record;

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory record feed.
///
/// - No IO / no async
/// - Best-effort fan-out
/// - At-least-once acceptable (subscribers must be idempotent)
#[derive(Debug, Default)]
pub struct InMemoryEventBus {
    subscribers: Mutex<Vec<mpsc::Sender<Record>>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventBus for InMemoryEventBus {
    type Error = InMemoryBusError;

    fn publish(&self, record: Record) -> Result<(), Self::Error> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(record.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, the feed is dead anyway; the
        // subscription simply never receives anything.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(stream: &str) -> Record {
        Record {
            event_type: "test:happened".to_string(),
            stream_id: stream.to_string(),
            sequence_number: 1,
            data: json!({}),
            metadata: None,
        }
    }

    #[test]
    fn every_subscriber_sees_every_record() {
        let bus = InMemoryEventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish(record("s-1")).unwrap();

        assert_eq!(first.try_recv().unwrap().stream_id, "s-1");
        assert_eq!(second.try_recv().unwrap().stream_id, "s-1");
    }

    #[test]
    fn records_published_before_subscribing_are_not_replayed() {
        let bus = InMemoryEventBus::new();
        bus.publish(record("s-1")).unwrap();

        let late = bus.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_do_not_block_publishing() {
        let bus = InMemoryEventBus::new();
        drop(bus.subscribe());
        bus.publish(record("s-1")).unwrap();
    }
}
