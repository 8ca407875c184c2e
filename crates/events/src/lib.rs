//! `draftleague-events` — event-sourcing abstractions.
//!
//! Events are immutable facts: append-only, never mutated or deleted.
//! This crate defines the event/codec/recorder contract the aggregates
//! build on, the persisted record shape, the command surface, and the
//! pub/sub feed read models subscribe to.

pub mod bus;
pub mod codec;
pub mod command;
pub mod event;
pub mod in_memory_bus;
pub mod projection;
pub mod record;
pub mod recorder;
pub mod sourcing;

pub use bus::{EventBus, Subscription};
pub use codec::{Codec, CodecError};
pub use command::{Arguments, Command};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use projection::Projection;
pub use record::Record;
pub use recorder::ChangeRecorder;
pub use sourcing::EventSourced;
