//! Infrastructure layer: persistence backends, the inventory store,
//! configuration, and background workers.

pub mod config;
pub mod store;
pub mod workers;

pub use config::{ConfigError, FoodwiseConfig};
pub use store::{
    CollectionBackend, InMemoryBackend, InventoryStore, JsonFileBackend, StorageError, StoreError,
};
pub use workers::{AlertSink, ExpiryWatcher, ExpiryWatcherConfig, TracingAlertSink};

#[cfg(test)]
mod integration_tests;
