//! Inventory access

use std::sync::Arc;

use super::hotel::Hotel;

/// Read-only source of searchable hotels.
///
/// Implementations hand out a shared snapshot, so callers never lock.
pub trait InventoryProvider: Send + Sync {
    fn snapshot(&self) -> Arc<[Hotel]>;
}
