use std::collections::HashMap;
use std::sync::RwLock;

use draftleague_core::ExpectedVersion;
use draftleague_events::Record;

use super::store::{EventStore, EventStoreError};

/// In-memory append-only event store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    streams: RwLock<HashMap<String, Vec<Record>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_version(stream: &[Record]) -> u64 {
        stream.last().map(|r| r.sequence_number).unwrap_or(0)
    }
}

impl EventStore for InMemoryEventStore {
    fn append(
        &self,
        stream_id: &str,
        expected_version: ExpectedVersion,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, EventStoreError> {
        if records.is_empty() {
            return Ok(vec![]);
        }
        if stream_id.is_empty() {
            return Err(EventStoreError::InvalidAppend(
                "stream id may not be empty".to_string(),
            ));
        }

        // All records must target the appended stream.
        for (idx, record) in records.iter().enumerate() {
            if record.stream_id != stream_id {
                return Err(EventStoreError::InvalidAppend(format!(
                    "batch contains a record for stream '{}' (index {idx})",
                    record.stream_id
                )));
            }
        }

        let mut streams = self
            .streams
            .write()
            .map_err(|_| EventStoreError::InvalidAppend("lock poisoned".to_string()))?;

        let stream = streams.entry(stream_id.to_string()).or_default();
        let current = Self::current_version(stream);

        if !expected_version.matches(current) {
            return Err(EventStoreError::Concurrency {
                stream_id: stream_id.to_string(),
                expected: expected_version,
                actual: current,
            });
        }

        // Assign sequence numbers and append (append-only).
        let mut next = current + 1;
        let mut committed = Vec::with_capacity(records.len());
        for mut record in records {
            record.sequence_number = next;
            next += 1;
            stream.push(record.clone());
            committed.push(record);
        }

        Ok(committed)
    }

    fn load(&self, stream_id: &str) -> Result<Vec<Record>, EventStoreError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| EventStoreError::InvalidAppend("lock poisoned".to_string()))?;

        Ok(streams.get(stream_id).cloned().unwrap_or_default())
    }
}
