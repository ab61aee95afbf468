//! `foodwise-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no clocks).

pub mod entity;
pub mod error;
pub mod food;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use food::{
    DEFAULT_HUMIDITY_PCT, DEFAULT_TEMPERATURE_C, FoodAttributes, FoodCategory, HUMIDITY_RANGE_PCT,
    Packaging, TEMPERATURE_RANGE_C,
};
pub use id::FoodItemId;
pub use value_object::ValueObject;
