use foodwise_core::FoodAttributes;

use crate::result::PredictionResult;

/// A shelf-life inference unit.
///
/// Implementations must be pure: no IO, no clocks, no interior mutability that
/// changes the answer. The same attributes always yield the same result.
pub trait ExpiryModel: Send + Sync + 'static {
    /// Stable model name, recorded alongside explanations.
    fn name(&self) -> &'static str;

    /// Predict remaining shelf life and risk for `attrs`.
    ///
    /// Total over its input: unknown categories or packaging fall back to
    /// documented defaults instead of failing.
    fn predict(&self, attrs: &FoodAttributes) -> PredictionResult;
}

impl<M> ExpiryModel for std::sync::Arc<M>
where
    M: ExpiryModel + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn predict(&self, attrs: &FoodAttributes) -> PredictionResult {
        (**self).predict(attrs)
    }
}
