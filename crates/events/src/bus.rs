//! The global event feed (pub/sub mechanics only).
//!
//! Records are appended to the store first, then published here for read
//! models to consume. Delivery is at-least-once and subscribers must be
//! idempotent; the bus is for distribution, not storage — the event store
//! stays the single source of truth.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::record::Record;

/// A subscription to the published feed.
///
/// Each subscription receives a copy of every record published after it
/// was created (broadcast semantics). Intended for single-threaded
/// consumption, typically a projection's feed loop.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Record>,
}

impl Subscription {
    pub fn new(receiver: Receiver<Record>) -> Self {
        Self { receiver }
    }

    /// Block until the next record is available.
    pub fn recv(&self) -> Result<Record, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a record without blocking.
    pub fn try_recv(&self) -> Result<Record, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a record.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Record, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Transport-agnostic feed of committed records.
pub trait EventBus: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, record: Record) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription;
}

impl<B> EventBus for Arc<B>
where
    B: EventBus + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, record: Record) -> Result<(), Self::Error> {
        (**self).publish(record)
    }

    fn subscribe(&self) -> Subscription {
        (**self).subscribe()
    }
}
