use std::sync::Arc;

use thiserror::Error;

use draftleague_core::ExpectedVersion;
use draftleague_events::Record;

/// Event store operation error.
///
/// These are infrastructure errors (storage, concurrency) as opposed to
/// domain errors (validation, invariants).
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The optimistic concurrency check failed: another writer appended to
    /// the stream since it was loaded. Reload and retry.
    #[error(
        "optimistic concurrency check failed on '{stream_id}': expected {expected:?}, found {actual}"
    )]
    Concurrency {
        stream_id: String,
        expected: ExpectedVersion,
        actual: u64,
    },

    /// The append batch was malformed (wrong stream, poisoned lock, ...).
    #[error("invalid append: {0}")]
    InvalidAppend(String),

    /// Publication failed after a successful append.
    #[error("event publication failed: {0}")]
    Publish(String),
}

/// Append-only, per-stream event store.
///
/// Streams are keyed by aggregate id. Within a stream, records carry
/// monotonically increasing sequence numbers (1, 2, 3, ...), assigned at
/// append time.
///
/// `append` is atomic: the whole batch is persisted or none of it, and the
/// expected-version comparison is the sole arbitration between concurrent
/// writers (no locks, no leases).
///
/// `load` returns the full stream as a finite, restartable sequence —
/// calling it twice replays from the beginning each time, it is not a
/// persistent cursor.
pub trait EventStore: Send + Sync {
    /// Append records to a stream, returning them with assigned sequence
    /// numbers.
    fn append(
        &self,
        stream_id: &str,
        expected_version: ExpectedVersion,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, EventStoreError>;

    /// Load the full stream, in sequence order. An unknown stream is empty.
    fn load(&self, stream_id: &str) -> Result<Vec<Record>, EventStoreError>;
}

impl<S> EventStore for Arc<S>
where
    S: EventStore + ?Sized,
{
    fn append(
        &self,
        stream_id: &str,
        expected_version: ExpectedVersion,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, EventStoreError> {
        (**self).append(stream_id, expected_version, records)
    }

    fn load(&self, stream_id: &str) -> Result<Vec<Record>, EventStoreError> {
        (**self).load(stream_id)
    }
}
