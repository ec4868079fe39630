//! Serialization of state mutations.

use tokio::sync::{Mutex, MutexGuard};

/// Held across a mutation and the broadcast it triggers.
///
/// Full-state updates are only correct if clients receive them in the order
/// the mutations were applied; taking this lock around "mutate, then
/// broadcast" guarantees that across all connection tasks.
#[derive(Debug, Default)]
pub struct MutationLock(Mutex<()>);

impl MutationLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
