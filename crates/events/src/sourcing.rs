//! The event-sourced aggregate contract.

use serde::Serialize;

use draftleague_core::AggregateRoot;

use crate::codec::{Codec, CodecError};
use crate::event::Event;
use crate::recorder::ChangeRecorder;

/// Contract shared by all event-sourced aggregates.
///
/// State is reconstructed solely by folding the aggregate's own ordered
/// event history; there is no snapshotting. `Default` produces the empty,
/// not-yet-created instance replay starts from.
pub trait EventSourced: AggregateRoot + Default {
    /// The aggregate's closed event type.
    type Event: Event + Serialize;

    /// The stream this aggregate's history lives in. Empty until created.
    fn stream_id(&self) -> &str;

    /// Pure fold: (current state, event) → new state.
    ///
    /// Must never fail, never validate, never emit further events, and must
    /// bump the version by exactly one. Validation already happened when the
    /// event was first recorded.
    fn mutate(&mut self, event: &Self::Event);

    /// Pending (unsaved) events.
    fn changes(&self) -> &[Self::Event];

    fn recorder(&mut self) -> &mut ChangeRecorder<Self::Event>;

    /// Whether the aggregate has been tombstoned.
    fn tombstoned(&self) -> bool {
        false
    }

    /// The codec covering every event type this aggregate can emit.
    fn codec() -> Result<Codec<Self::Event>, CodecError>;

    /// Record a freshly validated event and immediately fold it in
    /// (fold-on-write: state is never stale after a successful operation).
    fn apply(&mut self, event: Self::Event) {
        self.mutate(&event);
        self.recorder().record(event);
    }
}
