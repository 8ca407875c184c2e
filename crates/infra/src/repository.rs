//! Generic save/load for event-sourced aggregates.
//!
//! The repository orchestrates the persistence half of the aggregate
//! contract: `save` turns pending events into one atomic conditional
//! append; `load` rehydrates an aggregate by replaying its full stream
//! through the codec, in order, into a fresh instance.

use serde_json::Value as JsonValue;
use thiserror::Error;

use draftleague_core::ExpectedVersion;
use draftleague_events::{CodecError, EventSourced};

use crate::event_store::{EventStore, EventStoreError};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The stream is empty: the aggregate was never created.
    #[error("aggregate not found: {0}")]
    NotFound(String),

    /// The stream replays to a tombstoned aggregate.
    #[error("aggregate has been deleted: {0}")]
    Deleted(String),

    /// The conditional append lost the race; reload and retry.
    #[error("concurrency conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(EventStoreError),
}

impl From<EventStoreError> for RepositoryError {
    fn from(value: EventStoreError) -> Self {
        match value {
            EventStoreError::Concurrency { .. } => RepositoryError::Conflict(value.to_string()),
            other => RepositoryError::Store(other),
        }
    }
}

/// Persist an aggregate's pending events.
///
/// No-op when there is nothing pending. Otherwise computes
/// `expected = version - pending_count` and issues one atomic conditional
/// append. On a conflict the pending events stay intact so the caller can
/// reload, re-apply and retry; on success they are cleared (the events
/// remain part of the aggregate's history, they are just no longer
/// unsaved).
pub fn save<A, S>(
    store: &S,
    aggregate: &mut A,
    metadata: Option<&JsonValue>,
) -> Result<(), RepositoryError>
where
    A: EventSourced,
    S: EventStore + ?Sized,
{
    if aggregate.changes().is_empty() {
        return Ok(());
    }

    let pending = aggregate.changes().len() as u64;
    let expected = aggregate.version() - pending;
    let codec = A::codec()?;
    let records = codec.encode_all(aggregate.stream_id(), aggregate.changes(), metadata)?;

    store.append(aggregate.stream_id(), ExpectedVersion::Exact(expected), records)?;
    aggregate.recorder().clear();
    Ok(())
}

/// Rehydrate an aggregate by replaying its full stream.
///
/// Fails with `NotFound` on an empty stream and with `Deleted` when the
/// replayed aggregate is tombstoned; a tombstoned aggregate is never
/// returned as usable state.
pub fn load<A, S>(store: &S, id: &str) -> Result<A, RepositoryError>
where
    A: EventSourced,
    S: EventStore + ?Sized,
{
    let codec = A::codec()?;
    let mut aggregate = A::default();
    for record in store.load(id)? {
        let event = codec.decode(&record)?;
        aggregate.mutate(&event);
    }
    if aggregate.stream_id().is_empty() {
        return Err(RepositoryError::NotFound(id.to_string()));
    }
    if aggregate.tombstoned() {
        return Err(RepositoryError::Deleted(id.to_string()));
    }
    Ok(aggregate)
}
