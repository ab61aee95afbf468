//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Saved food items are entities: two records with identical attributes but
/// different ids are still distinct items in the inventory.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
