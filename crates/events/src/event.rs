use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodwise_core::FoodItemId;

/// A domain-agnostic event.
///
/// Events are **immutable** facts with a stable type name.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.item.saved").
    fn event_type(&self) -> &'static str;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// What changed in the inventory collection.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeKind {
    /// A new item was saved.
    Saved { id: FoodItemId },
    /// An item was deleted (or a delete of an absent id was requested).
    Deleted { id: FoodItemId },
    /// The whole collection was cleared.
    Cleared,
    /// Another writer (process/window) replaced the persisted collection.
    External,
}

/// "Items changed" signal emitted after every inventory mutation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryChange {
    pub kind: ChangeKind,
    pub occurred_at: DateTime<Utc>,
}

impl InventoryChange {
    pub fn new(kind: ChangeKind, occurred_at: DateTime<Utc>) -> Self {
        Self { kind, occurred_at }
    }

    pub fn saved(id: FoodItemId) -> Self {
        Self::new(ChangeKind::Saved { id }, Utc::now())
    }

    pub fn deleted(id: FoodItemId) -> Self {
        Self::new(ChangeKind::Deleted { id }, Utc::now())
    }

    pub fn cleared() -> Self {
        Self::new(ChangeKind::Cleared, Utc::now())
    }

    pub fn external() -> Self {
        Self::new(ChangeKind::External, Utc::now())
    }

    /// Item affected by this change, if the change targets a single item.
    pub fn item_id(&self) -> Option<FoodItemId> {
        match self.kind {
            ChangeKind::Saved { id } | ChangeKind::Deleted { id } => Some(id),
            ChangeKind::Cleared | ChangeKind::External => None,
        }
    }
}

impl Event for InventoryChange {
    fn event_type(&self) -> &'static str {
        match self.kind {
            ChangeKind::Saved { .. } => "inventory.item.saved",
            ChangeKind::Deleted { .. } => "inventory.item.deleted",
            ChangeKind::Cleared => "inventory.cleared",
            ChangeKind::External => "inventory.external_change",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
