//! Expiry arithmetic and item status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::SavedFoodItem;

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Default window for the expiring-soon set.
pub const DEFAULT_EXPIRING_THRESHOLD_DAYS: i64 = 3;

/// `ceil((expiry - now) / 1 day)` in milliseconds.
///
/// Calendar-independent: 23 hours left is 1 day, and anything that expired
/// less than a full day ago is still day 0.
pub fn day_difference(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = expiry.signed_duration_since(now).num_milliseconds();
    ms.div_euclid(MS_PER_DAY) + i64::from(ms.rem_euclid(MS_PER_DAY) != 0)
}

/// Whether `item` belongs to the expiring-soon set at `now`.
pub fn is_expiring_soon(item: &SavedFoodItem, now: DateTime<Utc>, threshold_days: i64) -> bool {
    let diff = item.days_left(now);
    (0..=threshold_days).contains(&diff)
}

/// Filter `items` down to the expiring-soon set, preserving order.
pub fn expiring_soon<'a, I>(items: I, now: DateTime<Utc>, threshold_days: i64) -> Vec<SavedFoodItem>
where
    I: IntoIterator<Item = &'a SavedFoodItem>,
{
    items
        .into_iter()
        .filter(|item| is_expiring_soon(item, now, threshold_days))
        .cloned()
        .collect()
}

/// Status bucket used by inventory statistics. Buckets are exclusive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Expired,
    ExpiringSoon,
    Safe,
}

impl ItemStatus {
    pub fn at(item: &SavedFoodItem, now: DateTime<Utc>, threshold_days: i64) -> Self {
        if item.is_expired(now) {
            ItemStatus::Expired
        } else if is_expiring_soon(item, now, threshold_days) {
            ItemStatus::ExpiringSoon
        } else {
            ItemStatus::Safe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::Expired => "Expired",
            ItemStatus::ExpiringSoon => "Expiring Soon",
            ItemStatus::Safe => "Safe",
        }
    }
}

/// Per-item badge shown in saved-item listings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShelfBadge {
    Expired,
    Critical,
    Warning,
    Good,
}

impl ShelfBadge {
    pub fn for_days(days_left: i64) -> Self {
        match days_left {
            d if d < 0 => ShelfBadge::Expired,
            0..=2 => ShelfBadge::Critical,
            3..=5 => ShelfBadge::Warning,
            _ => ShelfBadge::Good,
        }
    }

    pub fn for_item(item: &SavedFoodItem, now: DateTime<Utc>) -> Self {
        Self::for_days(item.days_left(now))
    }
}
