//! Per-identity locks
//!
//! Every log file has one async mutex. Holding it across resolve, append, and
//! persist keeps two concurrent events for the same conversation from both
//! loading the old body and overwriting each other's record.
//!
//! An entry lives only while someone holds or waits for its lock, so the
//! table stays as small as the set of conversations being written right now.

use chat_audit_core::LogIdentity;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Lock table keyed by log identity
#[derive(Debug, Default)]
pub struct IdentityLocks {
    locks: DashMap<LogIdentity, Arc<Mutex<()>>>,
}

impl IdentityLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one identity
    ///
    /// Identities never contend with each other.
    pub async fn acquire(&self, identity: LogIdentity) -> IdentityGuard<'_> {
        // Clone the Arc out so the shard lock is released before awaiting
        let lock = self.locks.entry(identity).or_default().clone();
        let guard = lock.lock_owned().await;
        IdentityGuard {
            locks: self,
            identity,
            guard: Some(guard),
        }
    }

    /// Drop the entry unless another task still holds or waits for it
    fn release(&self, identity: &LogIdentity) {
        // Clones are only taken under the shard lock, so a count of one here
        // cannot grow before the entry is gone
        self.locks
            .remove_if(identity, |_, lock| Arc::strong_count(lock) == 1);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

/// Exclusive access to one identity, released on drop
pub struct IdentityGuard<'a> {
    locks: &'a IdentityLocks,
    identity: LogIdentity,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for IdentityGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(&self.identity);
    }
}
