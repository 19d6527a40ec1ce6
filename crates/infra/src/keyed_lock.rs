//! Per-key mutual exclusion.
//!
//! The join/leave workflow serializes per staff member, not globally:
//! operations on the same key queue up, operations on distinct keys run
//! concurrently. Remote provisioning calls happen while the key's lock
//! is held, so a slow call stalls only that staff member.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// Lock table keyed by an arbitrary hashable key.
///
/// Entries are created on first use and retained; the table is bounded by
/// the number of distinct keys ever locked (staff ids, here).
#[derive(Debug, Default)]
pub struct KeyedLocks<K> {
    inner: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the lock for `key`, waiting behind any holder of the same
    /// key. The guard is owned so it can be held across await points.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let entry = {
            let mut map = self.inner.lock().unwrap();
            map.entry(key)
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };
        entry.lock_owned().await
    }
}
