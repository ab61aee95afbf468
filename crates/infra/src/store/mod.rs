//! Inventory persistence.
//!
//! [`InventoryStore`] owns the saved-item collection and publishes a change on
//! every mutation; a [`CollectionBackend`] decides where the serialized
//! collection actually lives.

pub mod backend;
pub mod inventory_store;

pub use backend::{CollectionBackend, InMemoryBackend, JsonFileBackend, STORAGE_KEY, StorageError};
pub use inventory_store::{InventoryStore, StoreError};
