use crate::record::Record;

/// A read model built by consuming the global event feed.
///
/// Projections are eventually consistent and disposable: events are the
/// source of truth and a projection can always be rebuilt by replaying the
/// feed from the start. The core only queries projections for command-time
/// validation (name availability, existence checks) and must never rely on
/// read-your-writes behavior.
///
/// `on` must be tolerant of records it does not care about (skip them) but
/// must stay idempotent-safe under at-least-once delivery.
pub trait Projection {
    /// Fold one record of the global feed into the read model.
    fn on(&self, record: &Record);

    /// Number of records applied so far.
    fn version(&self) -> u64;
}
