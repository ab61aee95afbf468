use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use foodwise_core::{FoodAttributes, FoodCategory, Packaging};

use crate::model::ExpiryModel;
use crate::result::{PredictionResult, RiskLevel, RiskThresholds};

/// Temperature tiers as `(exclusive lower bound °C, multiplier)`, warmest first.
const TEMPERATURE_TIERS: [(f64, f64); 6] = [
    (30.0, 0.2),
    (25.0, 0.4),
    (20.0, 0.6),
    (10.0, 0.8),
    (5.0, 1.0),
    (0.0, 1.3),
];

/// Multiplier at or below freezing.
const FROZEN_MULTIPLIER: f64 = 1.8;

/// Humidity deviation tiers as `(exclusive lower bound %, multiplier)`.
const HUMIDITY_TIERS: [(f64, f64); 3] = [(30.0, 0.6), (20.0, 0.7), (10.0, 0.85)];

/// A name pattern that replaces the category base value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOverride {
    Milk,
    Yogurt,
    Cheese,
    CottageCheese,
    LeafyGreens,
    Berries,
    Bread,
}

impl NameOverride {
    /// Match `name` against the known patterns, in priority order.
    pub fn detect(name: &str) -> Option<Self> {
        let name = name.to_lowercase();

        if name.contains("milk") {
            Some(NameOverride::Milk)
        } else if name.contains("yogurt") {
            Some(NameOverride::Yogurt)
        } else if name.contains("cheese") && !name.contains("cottage") {
            Some(NameOverride::Cheese)
        } else if name.contains("cottage cheese") {
            Some(NameOverride::CottageCheese)
        } else if ["leafy", "lettuce", "spinach"].iter().any(|p| name.contains(p)) {
            Some(NameOverride::LeafyGreens)
        } else if name.contains("berries") {
            Some(NameOverride::Berries)
        } else if name.contains("bread") {
            Some(NameOverride::Bread)
        } else {
            None
        }
    }

    pub fn days(&self) -> f64 {
        match self {
            NameOverride::Milk => 3.0,
            NameOverride::Yogurt => 5.0,
            NameOverride::Cheese => 7.0,
            NameOverride::CottageCheese => 4.0,
            NameOverride::LeafyGreens => 2.0,
            NameOverride::Berries => 2.0,
            NameOverride::Bread => 3.0,
        }
    }
}

/// Every factor that went into a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionBreakdown {
    pub base_days: f64,
    pub name_override: Option<NameOverride>,
    /// Days after the name override (equals `base_days` when none fired).
    pub starting_days: f64,
    pub temperature_factor: f64,
    pub humidity_deviation: f64,
    pub humidity_factor: f64,
    /// `None` when the packaging is unrecognized.
    pub packaging_factor: Option<f64>,
    /// Days before rounding.
    pub raw_days: f64,
    pub result: PredictionResult,
}

impl PredictionBreakdown {
    pub fn to_metadata(&self, model: &str) -> JsonValue {
        json!({
            "kind": "shelf_life.prediction",
            "model": model,
            "base_days": self.base_days,
            "name_override": self.name_override,
            "starting_days": self.starting_days,
            "temperature_factor": self.temperature_factor,
            "humidity_deviation": self.humidity_deviation,
            "humidity_factor": self.humidity_factor,
            "packaging_factor": self.packaging_factor,
            "raw_days": self.raw_days,
            "days": self.result.days,
            "risk": self.result.risk,
        })
    }
}

/// Deterministic rule cascade for shelf-life prediction.
///
/// Model:
/// - Start from a per-category base (or a name-pattern override).
/// - Multiply by temperature, humidity-deviation and packaging factors.
/// - Round to one decimal and classify risk.
#[derive(Debug, Clone, Default)]
pub struct RuleCascadeModel {
    risk_thresholds: RiskThresholds,
}

impl RuleCascadeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_risk_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.risk_thresholds = thresholds;
        self
    }

    pub fn risk_thresholds(&self) -> &RiskThresholds {
        &self.risk_thresholds
    }

    /// Run the cascade and report every factor applied.
    pub fn explain(&self, attrs: &FoodAttributes) -> PredictionBreakdown {
        let base_days = base_days(attrs.category);
        let name_override = NameOverride::detect(&attrs.name);
        let starting_days = name_override.map(|o| o.days()).unwrap_or(base_days);

        let temperature_factor = temperature_factor(attrs.temperature);
        let humidity_deviation = (attrs.humidity - optimal_humidity(attrs.category)).abs();
        let humidity_factor = humidity_factor(humidity_deviation);
        let packaging_factor = packaging_factor(attrs.packaging);

        let raw_days = starting_days
            * temperature_factor
            * humidity_factor
            * packaging_factor.unwrap_or(1.0);
        let days = round_to_tenth(raw_days);
        let risk = RiskLevel::classify(days, &self.risk_thresholds);

        PredictionBreakdown {
            base_days,
            name_override,
            starting_days,
            temperature_factor,
            humidity_deviation,
            humidity_factor,
            packaging_factor,
            raw_days,
            result: PredictionResult::new(days, risk),
        }
    }
}

impl ExpiryModel for RuleCascadeModel {
    fn name(&self) -> &'static str {
        "rule_cascade"
    }

    fn predict(&self, attrs: &FoodAttributes) -> PredictionResult {
        self.explain(attrs).result
    }
}

/// Predict with the default rule cascade.
pub fn predict(attrs: &FoodAttributes) -> PredictionResult {
    RuleCascadeModel::default().predict(attrs)
}

pub fn base_days(category: FoodCategory) -> f64 {
    match category {
        FoodCategory::Fruits => 5.0,
        FoodCategory::Vegetables => 4.0,
        FoodCategory::Dairy => 4.0,
        FoodCategory::Meat => 2.0,
        FoodCategory::Bakery => 3.0,
        FoodCategory::Other => 3.0,
    }
}

/// Optimal relative humidity (%) for a category.
pub fn optimal_humidity(category: FoodCategory) -> f64 {
    match category {
        FoodCategory::Fruits => 90.0,
        FoodCategory::Vegetables => 95.0,
        FoodCategory::Dairy => 40.0,
        FoodCategory::Meat => 70.0,
        FoodCategory::Bakery => 60.0,
        FoodCategory::Other => 70.0,
    }
}

fn temperature_factor(temperature: f64) -> f64 {
    TEMPERATURE_TIERS
        .iter()
        .find(|(above, _)| temperature > *above)
        .map(|(_, factor)| *factor)
        .unwrap_or(FROZEN_MULTIPLIER)
}

fn humidity_factor(deviation: f64) -> f64 {
    HUMIDITY_TIERS
        .iter()
        .find(|(above, _)| deviation > *above)
        .map(|(_, factor)| *factor)
        .unwrap_or(1.0)
}

fn packaging_factor(packaging: Packaging) -> Option<f64> {
    match packaging {
        Packaging::Vacuum => Some(1.7),
        Packaging::Plastic => Some(1.2),
        Packaging::Glass => Some(1.3),
        Packaging::Paper => Some(0.9),
        Packaging::None => Some(0.7),
        Packaging::Unknown => None,
    }
}

fn round_to_tenth(days: f64) -> f64 {
    (days * 10.0).round() / 10.0
}
