//! Single-flight gate for refresh runs

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// At most one holder at a time. A second `try_acquire` while a permit is
/// alive is refused, never queued.
#[derive(Debug, Clone)]
pub struct RefreshGate {
    slot: Arc<Semaphore>,
}

/// Held for the duration of one refresh; dropping it releases the gate
#[derive(Debug)]
pub struct RefreshPermit {
    _permit: OwnedSemaphorePermit,
}

impl RefreshPermit {
    pub fn release(self) {}
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn try_acquire(&self) -> Option<RefreshPermit> {
        self.slot
            .clone()
            .try_acquire_owned()
            .ok()
            .map(|permit| RefreshPermit { _permit: permit })
    }

    pub fn is_busy(&self) -> bool {
        self.slot.available_permits() == 0
    }
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}
