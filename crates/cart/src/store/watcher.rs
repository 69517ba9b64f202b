//! Mirrors committed cart states to persistent storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rocketshoes_core::Cart;

use crate::storage::PersistentStore;

/// Writes the full cart to storage whenever it sees a newer generation.
///
/// The generation the store was loaded at counts as already seen, so the
/// freshly loaded cart is never written back.
pub(crate) struct PersistenceWatcher {
    storage: Arc<dyn PersistentStore>,
    key: &'static str,
    last_seen: AtomicU64,
}

impl PersistenceWatcher {
    pub(crate) fn new(
        storage: Arc<dyn PersistentStore>,
        key: &'static str,
        initial_generation: u64,
    ) -> Self {
        Self {
            storage,
            key,
            last_seen: AtomicU64::new(initial_generation),
        }
    }

    /// Observe a committed state; returns whether a write was attempted.
    ///
    /// Callers must serialize calls in commit order (the store holds its
    /// commit lock). Write failures are logged and dropped: the next commit
    /// rewrites the whole cart anyway.
    pub(crate) fn observe(&self, generation: u64, cart: &Cart) -> bool {
        if generation <= self.last_seen.load(Ordering::Acquire) {
            return false;
        }
        self.last_seen.store(generation, Ordering::Release);

        match cart.to_json() {
            Ok(json) => {
                if let Err(e) = self.storage.write(self.key, &json) {
                    tracing::warn!(error = %e, generation, "Failed to persist cart");
                } else {
                    tracing::debug!(generation, items = cart.len(), "Cart persisted");
                }
            }
            Err(e) => tracing::warn!(error = %e, generation, "Failed to serialize cart"),
        }
        true
    }
}
