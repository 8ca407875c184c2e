use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// The persisted/transmitted shape of an event.
///
/// Notes:
/// - **Append-only**: `sequence_number` is assigned by the store and is
///   monotonically increasing per stream, starting at 1.
/// - `data` is the type-specific JSON payload; the codec maps
///   `event_type` ⇄ concrete payload struct.
/// - Ordering within a stream is the only ordering aggregate replay relies
///   on; global ordering matters only to read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub event_type: String,
    pub stream_id: String,

    /// Monotonically increasing position in the stream (0 until appended).
    pub sequence_number: u64,

    pub data: JsonValue,
    pub metadata: Option<JsonValue>,
}

impl Record {
    pub fn stream_version(&self) -> u64 {
        self.sequence_number
    }
}
