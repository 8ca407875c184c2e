//! Event type-name ⇄ payload-shape registry.
//!
//! Each aggregate owns a closed event enum; its codec knows how to encode
//! any variant into a [`Record`] and how to decode a record back into the
//! enum by looking up the record's logical type tag. Unknown types fail
//! loudly on decode, never skip silently.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::event::Event;
use crate::record::Record;

/// Codec operation error.
#[derive(Debug, Error)]
pub enum CodecError {
    /// A type tag was registered twice.
    #[error("event type already registered: {0}")]
    DuplicateRegistration(String),

    /// The record's type tag is not in the registry.
    #[error("unknown event type: {0}")]
    UnknownType(String),

    #[error("payload serialization failed for '{event_type}': {source}")]
    Serialize {
        event_type: String,
        source: serde_json::Error,
    },

    #[error("payload deserialization failed for '{event_type}': {source}")]
    Deserialize {
        event_type: String,
        source: serde_json::Error,
    },
}

type Decoder<E> = fn(&JsonValue) -> Result<E, serde_json::Error>;

/// Registry mapping a domain event's logical type name to its payload shape.
pub struct Codec<E> {
    decoders: HashMap<&'static str, Decoder<E>>,
}

impl<E> Default for Codec<E> {
    fn default() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }
}

impl<E> Codec<E>
where
    E: Event + Serialize,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder for a logical type name.
    pub fn register(
        &mut self,
        event_type: &'static str,
        decoder: Decoder<E>,
    ) -> Result<(), CodecError> {
        if self.decoders.insert(event_type, decoder).is_some() {
            return Err(CodecError::DuplicateRegistration(event_type.to_string()));
        }
        Ok(())
    }

    /// Serialize one event into a record for the given stream.
    ///
    /// Encoding requires the event's type to be registered, so that every
    /// record written is guaranteed to be decodable on replay.
    pub fn encode(
        &self,
        stream_id: &str,
        event: &E,
        metadata: Option<&JsonValue>,
    ) -> Result<Record, CodecError> {
        let event_type = event.event_type();
        if !self.decoders.contains_key(event_type) {
            return Err(CodecError::UnknownType(event_type.to_string()));
        }
        let data = serde_json::to_value(event).map_err(|source| CodecError::Serialize {
            event_type: event_type.to_string(),
            source,
        })?;
        Ok(Record {
            event_type: event_type.to_string(),
            stream_id: stream_id.to_string(),
            sequence_number: 0,
            data,
            metadata: metadata.cloned(),
        })
    }

    /// Serialize a batch of events, in order, for the given stream.
    pub fn encode_all(
        &self,
        stream_id: &str,
        events: &[E],
        metadata: Option<&JsonValue>,
    ) -> Result<Vec<Record>, CodecError> {
        events
            .iter()
            .map(|e| self.encode(stream_id, e, metadata))
            .collect()
    }

    /// Decode a record back into a domain event.
    pub fn decode(&self, record: &Record) -> Result<E, CodecError> {
        let decoder = self
            .decoders
            .get(record.event_type.as_str())
            .ok_or_else(|| CodecError::UnknownType(record.event_type.clone()))?;
        decoder(&record.data).map_err(|source| CodecError::Deserialize {
            event_type: record.event_type.clone(),
            source,
        })
    }
}

impl<E> core::fmt::Debug for Codec<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Codec")
            .field("types", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}
