use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodwise_core::FoodCategory;

use crate::item::SavedFoodItem;
use crate::status::ItemStatus;

/// Aggregated counts over the saved inventory. Counting only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total: usize,
    pub by_category: BTreeMap<FoodCategory, usize>,
    pub expired: usize,
    pub expiring_soon: usize,
    pub safe: usize,
}

impl InventoryStats {
    pub fn collect(items: &[SavedFoodItem], now: DateTime<Utc>, threshold_days: i64) -> Self {
        let mut stats = InventoryStats {
            total: items.len(),
            ..Default::default()
        };

        for item in items {
            *stats.by_category.entry(item.category).or_insert(0) += 1;
            match item.status(now, threshold_days) {
                ItemStatus::Expired => stats.expired += 1,
                ItemStatus::ExpiringSoon => stats.expiring_soon += 1,
                ItemStatus::Safe => {}
            }
        }

        stats.safe = stats.total.saturating_sub(stats.expired + stats.expiring_soon);
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn count_for(&self, category: FoodCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use foodwise_core::{FoodItemId, Packaging};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap()
    }

    fn item(category: FoodCategory, expires_in: Duration) -> SavedFoodItem {
        SavedFoodItem {
            id: FoodItemId::new(),
            name: category.label().to_string(),
            category,
            expiry_date: now() + expires_in,
            expiry_days: 4.0,
            temperature: 4.0,
            humidity: 50.0,
            packaging: Packaging::None,
            created_at: now() - Duration::days(3),
        }
    }

    #[test]
    fn counts_by_category_and_status() {
        let items = vec![
            item(FoodCategory::Dairy, -Duration::hours(2)),
            item(FoodCategory::Dairy, Duration::days(1)),
            item(FoodCategory::Meat, Duration::days(2)),
            item(FoodCategory::Fruits, Duration::days(8)),
            item(FoodCategory::Fruits, Duration::days(12)),
        ];

        let stats = InventoryStats::collect(&items, now(), 3);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.count_for(FoodCategory::Dairy), 2);
        assert_eq!(stats.count_for(FoodCategory::Meat), 1);
        assert_eq!(stats.count_for(FoodCategory::Fruits), 2);
        assert_eq!(stats.count_for(FoodCategory::Bakery), 0);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.expiring_soon, 2);
        assert_eq!(stats.safe, 2);
    }

    #[test]
    fn empty_inventory_has_empty_stats() {
        let stats = InventoryStats::collect(&[], now(), 3);
        assert!(stats.is_empty());
        assert_eq!(stats, InventoryStats::default());
    }

    #[test]
    fn category_keys_serialize_by_name() {
        let items = [item(FoodCategory::Bakery, Duration::days(9))];
        let stats = InventoryStats::collect(&items, now(), 3);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["by_category"]["bakery"], 1);
    }
}
