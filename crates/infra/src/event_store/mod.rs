//! Append-only event store boundary.
//!
//! This module defines an infrastructure-facing abstraction for storing and
//! loading event streams without making any storage assumptions.

pub mod in_memory;
pub mod store;

pub use in_memory::InMemoryEventStore;
pub use store::{EventStore, EventStoreError};

use draftleague_events::{EventBus, Record};

/// Adapter that publishes committed records to an `EventBus` after a
/// successful append.
///
/// This is the global feed read models subscribe to. Publish happens only
/// after append succeeds: the store stays the single source of truth and a
/// publish failure can be repaired by republishing, never by unappending.
pub struct PublishingStore<S, B> {
    store: S,
    bus: B,
}

impl<S, B> PublishingStore<S, B> {
    pub fn new(store: S, bus: B) -> Self {
        Self { store, bus }
    }

    pub fn into_parts(self) -> (S, B) {
        (self.store, self.bus)
    }
}

impl<S, B> EventStore for PublishingStore<S, B>
where
    S: EventStore,
    B: EventBus,
{
    fn append(
        &self,
        stream_id: &str,
        expected_version: draftleague_core::ExpectedVersion,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, EventStoreError> {
        // 1) Append (durable step)
        let committed = self.store.append(stream_id, expected_version, records)?;

        // 2) Publish committed records (best-effort; at-least-once acceptable)
        for record in &committed {
            self.bus
                .publish(record.clone())
                .map_err(|err| EventStoreError::Publish(format!("{err:?}")))?;
        }

        Ok(committed)
    }

    fn load(&self, stream_id: &str) -> Result<Vec<Record>, EventStoreError> {
        self.store.load(stream_id)
    }
}
