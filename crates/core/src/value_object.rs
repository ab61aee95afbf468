//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**; they are defined entirely by their
/// attribute values and are never mutated in place. `FoodAttributes` is the
/// canonical example: the same name, category and storage conditions always
/// describe the same input to the prediction engine.
///
/// ```ignore
/// let a = FoodAttributes::new("Milk", FoodCategory::Dairy, 4.0, 40.0, Packaging::Plastic);
/// let b = FoodAttributes::new("Milk", FoodCategory::Dairy, 4.0, 40.0, Packaging::Plastic);
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
