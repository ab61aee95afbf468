//! Change publishing/subscription abstraction (mechanics only).
//!
//! Views that depend on the inventory (lists, stats, notifications) refresh
//! when the store signals a change. Two consumption styles are supported:
//!
//! - **Subscriptions**: a channel receiver, for background workers that block
//!   waiting for the next change (see `recv_timeout`).
//! - **Observers**: callbacks invoked synchronously, in registration order,
//!   right after `publish` is called.
//!
//! Delivery is best-effort fan-out. Consumers must treat a change as "go
//! re-read the store", never as the data itself, so duplicates are harmless.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

/// A subscription to a change stream.
///
/// Each subscription gets a copy of every message published after it was
/// created (broadcast semantics). Use from a single thread.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// loop {
///     match subscription.recv_timeout(Duration::from_secs(1)) {
///         Ok(change) => refresh(change),
///         Err(RecvTimeoutError::Timeout) => continue,
///         Err(RecvTimeoutError::Disconnected) => break,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Handle returned by [`ChangeBus::observe`], used to unregister the callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub u64);

impl core::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// Observer callback type.
pub type Observer<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Transport-agnostic change bus.
///
/// `publish` fans a message out to every live subscription and then invokes
/// every registered observer on the caller's thread.
pub trait ChangeBus<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;

    /// Register a callback invoked synchronously after each publish.
    fn observe(&self, observer: Observer<M>) -> ObserverId;

    /// Remove a previously registered callback.
    ///
    /// Returns `false` if the id was unknown (already removed).
    fn unobserve(&self, id: ObserverId) -> bool;
}

impl<M, B> ChangeBus<M> for Arc<B>
where
    B: ChangeBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }

    fn observe(&self, observer: Observer<M>) -> ObserverId {
        (**self).observe(observer)
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        (**self).unobserve(id)
    }
}
