//! Infrastructure layer

pub mod inventory;
pub mod observability;

pub use inventory::{generate_hotels, InMemoryInventory, InventoryReadiness};
