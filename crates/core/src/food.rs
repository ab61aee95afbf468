//! Food attributes: the input describing an item and how it is stored.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Food category.
///
/// Unrecognized category names deserialize to [`FoodCategory::Other`], which
/// the prediction engine treats with its documented fallbacks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodCategory {
    Fruits,
    Vegetables,
    Dairy,
    Meat,
    Bakery,
    #[serde(other)]
    Other,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 6] = [
        FoodCategory::Fruits,
        FoodCategory::Vegetables,
        FoodCategory::Dairy,
        FoodCategory::Meat,
        FoodCategory::Bakery,
        FoodCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::Fruits => "fruits",
            FoodCategory::Vegetables => "vegetables",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Meat => "meat",
            FoodCategory::Bakery => "bakery",
            FoodCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::Fruits => "Fruits",
            FoodCategory::Vegetables => "Vegetables",
            FoodCategory::Dairy => "Dairy",
            FoodCategory::Meat => "Meat",
            FoodCategory::Bakery => "Bakery",
            FoodCategory::Other => "Other",
        }
    }

    /// Typical item names for this category (used as input suggestions).
    pub fn examples(&self) -> &'static [&'static str] {
        match self {
            FoodCategory::Fruits => &["Apple", "Banana", "Orange", "Strawberry", "Grapes"],
            FoodCategory::Vegetables => &["Carrot", "Broccoli", "Spinach", "Lettuce", "Tomato"],
            FoodCategory::Dairy => &["Milk", "Cheese", "Yogurt", "Butter", "Cream"],
            FoodCategory::Meat => &["Chicken", "Beef", "Pork", "Fish", "Turkey"],
            FoodCategory::Bakery => &["Bread", "Pastry", "Cake", "Cookie", "Muffin"],
            FoodCategory::Other => &[],
        }
    }
}

impl core::fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FoodCategory {
    type Err = DomainError;

    /// Parses a category name case-insensitively.
    ///
    /// An empty name is a validation error (no category selected); any other
    /// unrecognized name maps to [`FoodCategory::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(DomainError::validation("food category is required"));
        }
        Ok(FoodCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .unwrap_or(FoodCategory::Other))
    }
}

/// Packaging the item is stored in.
///
/// Unrecognized packaging deserializes to [`Packaging::Unknown`]; it carries
/// no shelf-life multiplier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Packaging {
    #[default]
    None,
    Plastic,
    Paper,
    Glass,
    Vacuum,
    #[serde(other)]
    Unknown,
}

impl Packaging {
    pub const KNOWN: [Packaging; 5] = [
        Packaging::None,
        Packaging::Plastic,
        Packaging::Paper,
        Packaging::Glass,
        Packaging::Vacuum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Packaging::None => "none",
            Packaging::Plastic => "plastic",
            Packaging::Paper => "paper",
            Packaging::Glass => "glass",
            Packaging::Vacuum => "vacuum",
            Packaging::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Packaging::None => "None",
            Packaging::Plastic => "Plastic Container",
            Packaging::Paper => "Paper/Cardboard",
            Packaging::Glass => "Glass Container",
            Packaging::Vacuum => "Vacuum Sealed",
            Packaging::Unknown => "Unknown",
        }
    }
}

impl core::fmt::Display for Packaging {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Packaging {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Ok(Packaging::KNOWN
            .into_iter()
            .find(|p| p.as_str() == s)
            .unwrap_or(Packaging::Unknown))
    }
}

/// Storage-condition defaults used by input forms.
pub const DEFAULT_TEMPERATURE_C: f64 = 22.0;
pub const DEFAULT_HUMIDITY_PCT: f64 = 50.0;

/// Bounds input forms offer; not enforced by the engine.
pub const TEMPERATURE_RANGE_C: (f64, f64) = (-10.0, 40.0);
pub const HUMIDITY_RANGE_PCT: (f64, f64) = (0.0, 100.0);

/// Attributes of a food item and its storage conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAttributes {
    pub name: String,
    pub category: FoodCategory,
    /// Storage temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    pub packaging: Packaging,
}

impl ValueObject for FoodAttributes {}

impl FoodAttributes {
    pub fn new(
        name: impl Into<String>,
        category: FoodCategory,
        temperature: f64,
        humidity: f64,
        packaging: Packaging,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            temperature,
            humidity,
            packaging,
        }
    }

    /// Reject input that must never reach the prediction engine.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("please enter a food name"));
        }
        Ok(())
    }

    /// Validate and return self, for builder-style call sites.
    pub fn validated(self) -> DomainResult<Self> {
        self.validate()?;
        Ok(self)
    }
}
