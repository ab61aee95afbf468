//! Expiry notifications derived from the expiring-soon set.
//!
//! Derivation is a pure read: it never touches the store, so running it again
//! over the same snapshot yields the same classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodwise_core::FoodItemId;

use crate::item::SavedFoodItem;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Critical,
    Warning,
}

/// Day boundaries for notification levels (inclusive upper bounds).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationThresholds {
    /// `days_left <= critical_max_days` is critical.
    pub critical_max_days: i64,
    /// `days_left <= warning_max_days` (and not critical) is a warning.
    pub warning_max_days: i64,
}

impl Default for NotificationThresholds {
    fn default() -> Self {
        Self {
            critical_max_days: 1,
            warning_max_days: 3,
        }
    }
}

impl NotificationThresholds {
    pub fn level_for(&self, days_left: i64) -> Option<NotificationLevel> {
        if days_left < 0 || days_left > self.warning_max_days {
            None
        } else if days_left <= self.critical_max_days {
            Some(NotificationLevel::Critical)
        } else {
            Some(NotificationLevel::Warning)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryNotification {
    pub item: SavedFoodItem,
    pub days_left: i64,
    pub level: NotificationLevel,
}

impl ExpiryNotification {
    pub fn item_id(&self) -> FoodItemId {
        self.item.id
    }

    pub fn is_critical(&self) -> bool {
        self.level == NotificationLevel::Critical
    }

    /// "Today", "Tomorrow" or "in N days".
    pub fn due_label(&self) -> String {
        match self.days_left {
            0 => "Today".to_string(),
            1 => "Tomorrow".to_string(),
            n => format!("in {n} days"),
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self.level {
            NotificationLevel::Critical => "Use Now",
            NotificationLevel::Warning => "Remind Me",
        }
    }

    /// One-line alert title, e.g. "Milk is expiring soon!".
    pub fn headline(&self) -> String {
        format!("{} is expiring soon!", self.item.name)
    }

    /// Alert detail, e.g. "Use it before Mar 5".
    pub fn use_before(&self) -> String {
        format!("Use it before {}", self.item.expiry_date.format("%b %-d"))
    }
}

/// Classification of the expiring-soon set at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSnapshot {
    pub generated_at: DateTime<Utc>,
    pub notifications: Vec<ExpiryNotification>,
}

impl NotificationSnapshot {
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            notifications: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn critical(&self) -> impl Iterator<Item = &ExpiryNotification> {
        self.notifications.iter().filter(|n| n.is_critical())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ExpiryNotification> {
        self.notifications.iter().filter(|n| !n.is_critical())
    }

    /// "No expiring items" or "N item(s)".
    pub fn summary(&self) -> String {
        match self.len() {
            0 => "No expiring items".to_string(),
            1 => "1 item".to_string(),
            n => format!("{n} items"),
        }
    }
}

/// Classify each item of the expiring-soon set as critical or warning.
///
/// Items outside `[0, warning_max_days]` are skipped, so passing the full
/// inventory is also safe. Input order is preserved.
pub fn derive_notifications(
    expiring: &[SavedFoodItem],
    now: DateTime<Utc>,
    thresholds: &NotificationThresholds,
) -> NotificationSnapshot {
    let notifications = expiring
        .iter()
        .filter_map(|item| {
            let days_left = item.days_left(now);
            thresholds.level_for(days_left).map(|level| ExpiryNotification {
                item: item.clone(),
                days_left,
                level,
            })
        })
        .collect();

    NotificationSnapshot {
        generated_at: now,
        notifications,
    }
}
