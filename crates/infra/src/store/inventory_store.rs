//! The persisted inventory collection.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, error, warn};

use foodwise_core::FoodItemId;
use foodwise_events::{ChangeBus, InventoryChange, Subscription};
use foodwise_inventory::{
    DEFAULT_EXPIRING_THRESHOLD_DAYS, InventoryStats, NewFoodItem, SavedFoodItem, expiring_soon,
};

use super::backend::{CollectionBackend, StorageError};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be read; no write was attempted.
    #[error("failed to load inventory from {key}: {source}")]
    Load {
        key: String,
        #[source]
        source: StorageError,
    },

    /// The persisted collection could not be parsed.
    #[error("failed to read inventory from {key}: {reason}")]
    Read { key: String, reason: String },

    /// The backend rejected a write; the mutation did not happen.
    #[error("failed to write inventory: {0}")]
    Write(#[source] StorageError),

    #[error("failed to serialize inventory: {0}")]
    Serialize(#[from] serde_json::Error),
}

struct StoreState<B> {
    backend: B,
    /// Last backend revision this store wrote or observed.
    seen_revision: Option<u64>,
}

/// Owner of the saved-item collection.
///
/// All mutations are whole-collection read-modify-write cycles performed while
/// holding one lock, so concurrent `save`/`delete` calls serialize and never
/// lose each other's updates. After every mutation an [`InventoryChange`] is
/// published on the bus.
pub struct InventoryStore<B, E> {
    state: Mutex<StoreState<B>>,
    bus: E,
    expiring_threshold_days: i64,
}

impl<B, E> InventoryStore<B, E>
where
    B: CollectionBackend,
    E: ChangeBus<InventoryChange>,
{
    pub fn new(backend: B, bus: E) -> Self {
        let seen_revision = backend.revision();
        Self {
            state: Mutex::new(StoreState {
                backend,
                seen_revision,
            }),
            bus,
            expiring_threshold_days: DEFAULT_EXPIRING_THRESHOLD_DAYS,
        }
    }

    /// Threshold used by [`Self::stats`] and [`Self::expiring_soon_default`].
    pub fn with_expiring_threshold(mut self, days: i64) -> Self {
        self.expiring_threshold_days = days;
        self
    }

    pub fn expiring_threshold_days(&self) -> i64 {
        self.expiring_threshold_days
    }

    pub fn bus(&self) -> &E {
        &self.bus
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> Subscription<InventoryChange> {
        self.bus.subscribe()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState<B>>, StorageError> {
        self.state.lock().map_err(|_| StorageError::Poisoned)
    }

    /// All saved items, in insertion order.
    ///
    /// Never fails: unreadable or corrupt storage is logged and reads as empty.
    pub fn list(&self) -> Vec<SavedFoodItem> {
        match self.try_list() {
            Ok(items) => items,
            Err(err) => {
                warn!(error = %err, "inventory unreadable; treating as empty");
                Vec::new()
            }
        }
    }

    /// Like [`Self::list`], but surfaces read failures.
    pub fn try_list(&self) -> Result<Vec<SavedFoodItem>, StoreError> {
        let state = self.lock().map_err(|e| StoreError::Read {
            key: String::new(),
            reason: e.to_string(),
        })?;
        read_collection(&state.backend)
    }

    pub fn get(&self, id: FoodItemId) -> Option<SavedFoodItem> {
        self.list().into_iter().find(|item| item.id == id)
    }

    /// Persist a new item, stamping a fresh id and the current time.
    pub fn save(&self, item: NewFoodItem) -> Result<SavedFoodItem, StoreError> {
        self.save_at(item, Utc::now())
    }

    /// [`Self::save`] with an explicit creation time.
    ///
    /// `expiry_days` is stored exactly as given.
    pub fn save_at(
        &self,
        item: NewFoodItem,
        now: DateTime<Utc>,
    ) -> Result<SavedFoodItem, StoreError> {
        let saved = {
            let mut state = self.lock().map_err(StoreError::Write)?;
            let mut items = recover_collection(&state.backend).inspect_err(|err| {
                error!(error = %err, item = %item.name, "failed to save food item");
            })?;

            let saved = SavedFoodItem::from_new(item, FoodItemId::new(), now);
            items.push(saved.clone());

            write_collection(&mut state, &items).inspect_err(|err| {
                error!(error = %err, item = %saved.name, "failed to save food item");
            })?;
            saved
        };

        debug!(
            item_id = %saved.id,
            name = %saved.name,
            expiry_days = saved.expiry_days,
            "food item saved"
        );
        self.notify(InventoryChange::saved(saved.id));
        Ok(saved)
    }

    /// Remove an item by id. Deleting an unknown id is a silent no-op.
    pub fn delete(&self, id: FoodItemId) -> Result<(), StoreError> {
        {
            let mut state = self.lock().map_err(StoreError::Write)?;
            let mut items = recover_collection(&state.backend).inspect_err(|err| {
                error!(error = %err, item_id = %id, "failed to delete food item");
            })?;

            let before = items.len();
            items.retain(|item| item.id != id);
            let removed = before != items.len();

            write_collection(&mut state, &items).inspect_err(|err| {
                error!(error = %err, item_id = %id, "failed to delete food item");
            })?;
            debug!(item_id = %id, removed, "food item delete processed");
        }

        self.notify(InventoryChange::deleted(id));
        Ok(())
    }

    /// Remove every saved item.
    pub fn clear(&self) -> Result<(), StoreError> {
        {
            let mut state = self.lock().map_err(StoreError::Write)?;
            state.backend.clear().map_err(StoreError::Write)?;
            state.seen_revision = state.backend.revision();
        }

        debug!("inventory cleared");
        self.notify(InventoryChange::cleared());
        Ok(())
    }

    /// Items expiring within `threshold_days` from now (inclusive), excluding
    /// already-expired ones.
    pub fn expiring_soon(&self, threshold_days: i64) -> Vec<SavedFoodItem> {
        self.expiring_soon_at(threshold_days, Utc::now())
    }

    pub fn expiring_soon_at(&self, threshold_days: i64, now: DateTime<Utc>) -> Vec<SavedFoodItem> {
        expiring_soon(&self.list(), now, threshold_days)
    }

    /// [`Self::expiring_soon`] with the store's configured threshold.
    pub fn expiring_soon_default(&self) -> Vec<SavedFoodItem> {
        self.expiring_soon(self.expiring_threshold_days)
    }

    pub fn stats(&self) -> InventoryStats {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> InventoryStats {
        InventoryStats::collect(&self.list(), now, self.expiring_threshold_days)
    }

    /// Detect writes made by another handle on the same backend (another
    /// process or window) and publish [`InventoryChange::external`] if so.
    ///
    /// Returns whether a change was detected.
    pub fn check_external_change(&self) -> bool {
        let changed = match self.lock() {
            Ok(mut state) => {
                let current = state.backend.revision();
                if current.is_some() && current != state.seen_revision {
                    state.seen_revision = current;
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        };

        if changed {
            debug!("inventory changed by another writer");
            self.notify(InventoryChange::external());
        }
        changed
    }

    fn notify(&self, change: InventoryChange) {
        if let Err(err) = self.bus.publish(change) {
            warn!(error = %err, "failed to publish inventory change");
        }
    }
}

impl<B, E> core::fmt::Debug for InventoryStore<B, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("expiring_threshold_days", &self.expiring_threshold_days)
            .finish_non_exhaustive()
    }
}

fn read_collection<B: CollectionBackend>(backend: &B) -> Result<Vec<SavedFoodItem>, StoreError> {
    let raw = backend.load().map_err(|source| StoreError::Load {
        key: backend.key().to_string(),
        source,
    })?;

    match raw {
        None => Ok(Vec::new()),
        Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Read {
            key: backend.key().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Read for a read-modify-write cycle: a corrupt collection is replaced, but a
/// backend that cannot be read fails the mutation before anything is written.
fn recover_collection<B: CollectionBackend>(
    backend: &B,
) -> Result<Vec<SavedFoodItem>, StoreError> {
    match read_collection(backend) {
        Err(err @ StoreError::Read { .. }) => {
            warn!(error = %err, "inventory corrupt; it will be overwritten by this write");
            Ok(Vec::new())
        }
        other => other,
    }
}

fn write_collection<B: CollectionBackend>(
    state: &mut StoreState<B>,
    items: &[SavedFoodItem],
) -> Result<(), StoreError> {
    let payload = serde_json::to_string(items)?;
    state.backend.store(&payload).map_err(StoreError::Write)?;
    state.seen_revision = state.backend.revision();
    Ok(())
}
