//! In-process change bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Mutex};

use thiserror::Error;

use crate::bus::{ChangeBus, Observer, ObserverId, Subscription};

#[derive(Debug, Error)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("change bus lock poisoned")]
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out to subscriptions, dead receivers are pruned
/// - Observers run synchronously on the publishing thread
pub struct InMemoryChangeBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
    observers: Mutex<Vec<(ObserverId, Observer<M>)>>,
    next_observer: AtomicU64,
}

impl<M> InMemoryChangeBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().map(|o| o.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryChangeBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            observers: Mutex::new(Vec::new()),
            next_observer: AtomicU64::new(1),
        }
    }
}

impl<M> core::fmt::Debug for InMemoryChangeBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryChangeBus")
            .field("subscribers", &self.subscribers.lock().map(|s| s.len()).unwrap_or(0))
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl<M> ChangeBus<M> for InMemoryChangeBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        {
            let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;
            // Drop any dead subscribers while publishing.
            subs.retain(|tx| tx.send(message.clone()).is_ok());
        }

        // Snapshot first so callbacks may (un)register observers without deadlocking.
        let observers: Vec<Observer<M>> = self
            .observers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();

        for cb in observers {
            cb(&message);
        }

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }

    fn observe(&self, observer: Observer<M>) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut obs) = self.observers.lock() {
            obs.push((id, observer));
        }
        id
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        match self.observers.lock() {
            Ok(mut obs) => {
                let before = obs.len();
                obs.retain(|(oid, _)| *oid != id);
                obs.len() != before
            }
            Err(_) => false,
        }
    }
}
