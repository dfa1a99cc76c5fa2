//! Lock striping: one `tokio::sync::Mutex` per row key, created on first
//! access and kept for the process lifetime. This is what gives
//! [`crate::MemStore`] the `SELECT ... FOR UPDATE`-equivalent semantics
//! §5 requires without needing a real database underneath.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// A striped set of per-key locks. Acquiring the lock for a key never
/// blocks on an unrelated key.
pub struct RowLocks<K> {
    inner: Mutex<HashMap<K, Arc<tokio::sync::Mutex<()>>>>,
}

impl<K> Default for RowLocks<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> RowLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Acquires the lock for `key`, suspending the caller (not the table
    /// mutex) until it is available.
    pub async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let row_mutex = {
            let mut table = self.inner.lock().expect("row lock table poisoned");
            table.entry(key).or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))).clone()
        };
        row_mutex.lock_owned().await
    }
}
