//! Banner alert tiering for a fresh prediction.
//!
//! The banner uses its own day boundaries (2/4 by default). They are not the
//! engine's risk thresholds (1.5/3) and must stay configurable separately.

use serde::{Deserialize, Serialize};

use crate::result::PredictionResult;

/// Day boundaries for banner severity.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Strictly fewer days than this is critical.
    pub critical_below: f64,
    /// Strictly fewer days than this (and not critical) is a warning.
    pub warning_below: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical_below: 2.0,
            warning_below: 4.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTier {
    Critical,
    Warning,
    Info,
}

impl AlertTier {
    pub fn for_days(days: f64, thresholds: &AlertThresholds) -> Self {
        if days < thresholds.critical_below {
            AlertTier::Critical
        } else if days < thresholds.warning_below {
            AlertTier::Warning
        } else {
            AlertTier::Info
        }
    }
}

/// Banner content for a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionAlert {
    pub tier: AlertTier,
    pub title: String,
    pub message: String,
    pub action: String,
}

impl PredictionAlert {
    pub fn new(name: &str, days: f64, thresholds: &AlertThresholds) -> Self {
        let tier = AlertTier::for_days(days, thresholds);
        let (title, message, action) = match tier {
            AlertTier::Critical => (
                "Critical Expiry Alert",
                format!(
                    "{name} will expire within {} days! Consume immediately.",
                    thresholds.critical_below
                ),
                "Add to Shopping List",
            ),
            AlertTier::Warning => (
                "Expiry Warning",
                format!(
                    "{name} will expire in {} days. Plan to use it soon.",
                    days.round() as i64
                ),
                "Set Reminder",
            ),
            AlertTier::Info => (
                "Storage Tip",
                format!("Optimize {name} freshness by adjusting storage conditions."),
                "View Storage Tips",
            ),
        };

        Self {
            tier,
            title: title.to_string(),
            message,
            action: action.to_string(),
        }
    }

    pub fn for_prediction(
        name: &str,
        prediction: &PredictionResult,
        thresholds: &AlertThresholds,
    ) -> Self {
        Self::new(name, prediction.days, thresholds)
    }
}
