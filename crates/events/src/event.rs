use chrono::{DateTime, Utc};

/// A domain event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - designed to be **append-only**
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable logical type tag (e.g. "tournament:created").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    ///
    /// Folds must only ever read this recorded value, never the wall clock,
    /// so that replay is deterministic.
    fn occurred_on(&self) -> DateTime<Utc>;
}
