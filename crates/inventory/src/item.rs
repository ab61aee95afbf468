use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use foodwise_ai::PredictionResult;
use foodwise_core::{Entity, FoodAttributes, FoodCategory, FoodItemId, Packaging};

use crate::status::{self, ItemStatus, MS_PER_DAY};

/// A food item persisted after a prediction.
///
/// Immutable once created: the only lifecycle transition is deletion. Items
/// are never removed automatically, even long after `expiry_date` has passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFoodItem {
    pub id: FoodItemId,
    pub name: String,
    pub category: FoodCategory,
    pub expiry_date: DateTime<Utc>,
    /// Predicted shelf life at save time. Never recomputed.
    pub expiry_days: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub packaging: Packaging,
    pub created_at: DateTime<Utc>,
}

impl Entity for SavedFoodItem {
    type Id = FoodItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl SavedFoodItem {
    /// Materialize a record from save input, stamping identity and creation time.
    pub fn from_new(item: NewFoodItem, id: FoodItemId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: item.name,
            category: item.category,
            expiry_date: item.expiry_date,
            expiry_days: item.expiry_days,
            temperature: item.temperature,
            humidity: item.humidity,
            packaging: item.packaging,
            created_at,
        }
    }

    /// Whole days until expiry, rounded up (see [`status::day_difference`]).
    pub fn days_left(&self, now: DateTime<Utc>) -> i64 {
        status::day_difference(self.expiry_date, now)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date < now
    }

    pub fn status(&self, now: DateTime<Utc>, threshold_days: i64) -> ItemStatus {
        ItemStatus::at(self, now, threshold_days)
    }

    /// Attributes the item was saved with.
    pub fn attributes(&self) -> FoodAttributes {
        FoodAttributes::new(
            self.name.clone(),
            self.category,
            self.temperature,
            self.humidity,
            self.packaging,
        )
    }
}

/// Save input: a saved item without `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFoodItem {
    pub name: String,
    pub category: FoodCategory,
    pub expiry_date: DateTime<Utc>,
    pub expiry_days: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub packaging: Packaging,
}

impl NewFoodItem {
    /// Freeze a prediction made at `now` into save input.
    ///
    /// `expiry_date` is `now + prediction.days`, at millisecond precision.
    pub fn from_prediction(
        attrs: &FoodAttributes,
        prediction: &PredictionResult,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: attrs.name.trim().to_string(),
            category: attrs.category,
            expiry_date: expiry_date_after(now, prediction.days),
            expiry_days: prediction.days,
            temperature: attrs.temperature,
            humidity: attrs.humidity,
            packaging: attrs.packaging,
        }
    }
}

/// `now` plus a fractional number of days.
pub fn expiry_date_after(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    let ms = (days * MS_PER_DAY as f64).round() as i64;
    now + Duration::milliseconds(ms)
}
