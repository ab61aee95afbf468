//! Inventory domain module.
//!
//! Saved food items and everything derived from them (expiry arithmetic,
//! statuses, notifications, statistics), implemented purely as deterministic
//! domain logic. Callers pass `now` explicitly; no IO, no storage.

pub mod item;
pub mod notification;
pub mod stats;
pub mod status;

pub use item::{NewFoodItem, SavedFoodItem, expiry_date_after};
pub use notification::{
    ExpiryNotification, NotificationLevel, NotificationSnapshot, NotificationThresholds,
    derive_notifications,
};
pub use stats::InventoryStats;
pub use status::{
    DEFAULT_EXPIRING_THRESHOLD_DAYS, ItemStatus, MS_PER_DAY, ShelfBadge, day_difference,
    expiring_soon, is_expiring_soon,
};
