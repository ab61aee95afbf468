//! `foodwise-ai`
//!
//! **Responsibility:** shelf-life prediction.
//!
//! The "AI" here is a deterministic rule cascade, not a trained model:
//! - It never performs IO and never mutates inventory state.
//! - It is total: unknown categories or packaging fall back to defaults.
//! - It emits **predictions**, not inventory changes.

pub mod advice;
pub mod alert;
pub mod model;
pub mod result;
pub mod shelf_life;

pub use advice::storage_tips;
pub use alert::{AlertThresholds, AlertTier, PredictionAlert};
pub use model::ExpiryModel;
pub use result::{PredictionResult, RiskLevel, RiskThresholds};
pub use shelf_life::{NameOverride, PredictionBreakdown, RuleCascadeModel, predict};
