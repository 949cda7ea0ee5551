use crate::domain::model::ProductId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = HashMap<ProductId, Arc<AsyncMutex<()>>>;

/// One async lock per product id, created on first use.
///
/// Cart operations hold the lock of their product for the whole call,
/// lookup included, so two calls on the same id never interleave. An entry
/// lives only while someone holds or waits for it.
#[derive(Default)]
pub struct ProductLocks {
    locks: Mutex<LockTable>,
}

/// Held for the duration of one cart operation on `product_id`.
pub struct ProductLockGuard<'a> {
    product_id: ProductId,
    guard: Option<OwnedMutexGuard<()>>,
    owner: &'a ProductLocks,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    // The table guard is never held across an await, so poisoning can only
    // come from a panic inside a map operation; recover the map as-is.
    fn table(&self) -> MutexGuard<'_, LockTable> {
        self.locks.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn get_lock(&self, product_id: ProductId) -> Arc<AsyncMutex<()>> {
        self.table()
            .entry(product_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    pub async fn acquire(&self, product_id: ProductId) -> ProductLockGuard<'_> {
        let lock = self.get_lock(product_id);
        let guard = lock.lock_owned().await;
        ProductLockGuard {
            product_id,
            guard: Some(guard),
            owner: self,
        }
    }

    /// Drops the entry for `product_id` when the table holds the only handle.
    fn release(&self, product_id: ProductId) {
        let mut locks = self.table();
        if locks
            .get(&product_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&product_id);
        }
    }

    /// Ids with an operation currently in flight.
    pub fn pending(&self) -> Vec<ProductId> {
        let locks = self.table();
        let mut ids: Vec<ProductId> = locks
            .iter()
            .filter(|(_, lock)| lock.try_lock().is_err())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl Drop for ProductLockGuard<'_> {
    fn drop(&mut self) {
        // Unlock first so the guard's handle no longer counts.
        self.guard.take();
        self.owner.release(self.product_id);
    }
}
