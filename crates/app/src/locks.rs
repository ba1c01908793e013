//! Per-pickup-point serialization of mutating use cases.
//!
//! Opening a reception and removing the last product are read-then-write
//! sequences. Holding the pickup point's lock across the pair keeps two
//! requests in this process from interleaving. Stores that are shared between
//! processes back this with their own constraint (see the Postgres migration).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use pvz_core::PvzId;

type Slots = HashMap<PvzId, Arc<AsyncMutex<()>>>;

/// Slots exist only while someone holds or waits on them, so the map stays
/// bounded by the number of pickup points currently being mutated.
#[derive(Debug, Clone, Default)]
pub struct PickupPointLocks {
    inner: Arc<Mutex<Slots>>,
}

impl PickupPointLocks {
    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn lock(&self, id: PvzId) -> PickupPointGuard {
        let slot = self.slots().entry(id).or_default().clone();
        let guard = slot.lock_owned().await;

        PickupPointGuard {
            id,
            locks: self.clone(),
            guard: Some(guard),
        }
    }

    fn slots(&self) -> MutexGuard<'_, Slots> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots().len()
    }
}

/// Exclusive access to one pickup point.
#[derive(Debug)]
pub struct PickupPointGuard {
    id: PvzId,
    locks: PickupPointLocks,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for PickupPointGuard {
    fn drop(&mut self) {
        // Unlock first so the slot's only remaining owner can be the map.
        self.guard.take();

        let mut slots = self.locks.slots();
        if slots.get(&self.id).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_pickup_point_is_exclusive() {
        let locks = PickupPointLocks::default();
        let id = PvzId::new();

        let guard = locks.lock(id).await;
        let contended = tokio::time::timeout(Duration::from_millis(50), locks.lock(id)).await;
        assert!(contended.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.lock(id)).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_pickup_points_do_not_contend() {
        let locks = PickupPointLocks::default();
        let _a = locks.lock(PvzId::new()).await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.lock(PvzId::new())).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn slot_is_dropped_with_last_guard() {
        let locks = PickupPointLocks::default();
        let id = PvzId::new();

        let guard = locks.lock(id).await;
        assert_eq!(locks.len(), 1);
        drop(guard);
        assert_eq!(locks.len(), 0);

        for _ in 0..100 {
            drop(locks.lock(PvzId::new()).await);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn slot_survives_while_a_waiter_is_queued() {
        let locks = PickupPointLocks::default();
        let id = PvzId::new();

        let first = locks.lock(id).await;
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _second = locks.lock(id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
