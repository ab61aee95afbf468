use serde::{Deserialize, Serialize};

/// Coarse classification of imminent spoilage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify a predicted shelf life. Monotonic: fewer days never lowers risk.
    pub fn classify(days: f64, thresholds: &RiskThresholds) -> Self {
        if days < thresholds.high_below {
            RiskLevel::High
        } else if days < thresholds.medium_below {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// Spoilage-risk gauge value in percent.
    pub fn spoilage_percent(&self) -> u8 {
        match self {
            RiskLevel::Low => 25,
            RiskLevel::Medium => 65,
            RiskLevel::High => 95,
        }
    }

    /// Freshness gauge value in percent (inverse of the risk gauge).
    pub fn freshness_percent(&self) -> u8 {
        100 - self.spoilage_percent()
    }
}

impl core::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day boundaries for the engine's own risk classification.
///
/// These are independent from the banner tiers in [`crate::alert::AlertThresholds`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Strictly fewer days than this is high risk.
    pub high_below: f64,
    /// Strictly fewer days than this (and not high) is medium risk.
    pub medium_below: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_below: 1.5,
            medium_below: 3.0,
        }
    }
}

/// Output of the prediction engine.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Remaining shelf life in days, rounded to one decimal.
    pub days: f64,
    pub risk: RiskLevel,
}

impl PredictionResult {
    pub fn new(days: f64, risk: RiskLevel) -> Self {
        Self { days, risk }
    }

    pub fn freshness_percent(&self) -> u8 {
        self.risk.freshness_percent()
    }

    /// "day" for exactly one day, "days" otherwise.
    pub fn days_unit(&self) -> &'static str {
        if self.days == 1.0 { "day" } else { "days" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_boundaries_are_strict_lower_bounds() {
        let t = RiskThresholds::default();
        assert_eq!(RiskLevel::classify(1.5, &t), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(3.0, &t), RiskLevel::Low);
        assert_eq!(RiskLevel::classify(1.4999, &t), RiskLevel::High);
        assert_eq!(RiskLevel::classify(2.9999, &t), RiskLevel::Medium);
        assert_eq!(RiskLevel::classify(0.0, &t), RiskLevel::High);
    }

    #[test]
    fn freshness_is_the_inverse_of_spoilage() {
        assert_eq!(RiskLevel::Low.freshness_percent(), 75);
        assert_eq!(RiskLevel::Medium.freshness_percent(), 35);
        assert_eq!(RiskLevel::High.freshness_percent(), 5);
    }

    #[test]
    fn serializes_risk_in_lowercase() {
        let result = PredictionResult::new(3.6, RiskLevel::Low);
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(json["risk"], "low");
        assert_eq!(json["days"], 3.6);
    }
}
