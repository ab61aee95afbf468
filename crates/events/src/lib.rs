//! `foodwise-events`: the process-wide "items changed" signal.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{ChangeBus, Observer, ObserverId, Subscription};
pub use event::{ChangeKind, Event, InventoryChange};
pub use in_memory_bus::{InMemoryBusError, InMemoryChangeBus};
