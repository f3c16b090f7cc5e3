//! Per-entity in-memory list caches.
//!
//! Each entity type gets one `ListCache` holding the full list snapshot from
//! the last remote read. Mutations invalidate the whole cache for that type;
//! at this data scale coarse invalidation beats row-level bookkeeping.
//!
//! Caches are owned by the façade instance, not module globals, so tests can
//! run independent instances in parallel. They never survive the process and
//! are never authoritative.

use std::sync::{Mutex, PoisonError};

/// A cached list of entities, or "not populated yet".
pub struct ListCache<T> {
  inner: Mutex<Option<Vec<T>>>,
}

impl<T: Clone> ListCache<T> {
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(None),
    }
  }

  /// Return the cached list, or `None` if the cache has not been populated
  /// (or was invalidated) since the last remote read.
  pub fn snapshot(&self) -> Option<Vec<T>> {
    self.lock().clone()
  }

  /// Populate the cache with a fresh list.
  pub fn fill(&self, items: Vec<T>) {
    *self.lock() = Some(items);
  }

  /// Discard the cached list so the next read goes to the remote store.
  pub fn invalidate(&self) {
    *self.lock() = None;
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<T>>> {
    // A poisoned cache just means a panic mid-write; the stale value is
    // discarded by the next invalidate, so recover rather than propagate.
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T: Clone> Default for ListCache<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_unpopulated() {
    let cache: ListCache<u32> = ListCache::new();
    assert!(cache.snapshot().is_none());
  }

  #[test]
  fn fill_then_snapshot() {
    let cache = ListCache::new();
    cache.fill(vec![1, 2, 3]);
    assert_eq!(cache.snapshot(), Some(vec![1, 2, 3]));
  }

  #[test]
  fn invalidate_discards() {
    let cache = ListCache::new();
    cache.fill(vec![1]);
    cache.invalidate();
    assert!(cache.snapshot().is_none());
  }

  #[test]
  fn instances_are_independent() {
    let a = ListCache::new();
    let b: ListCache<u32> = ListCache::new();
    a.fill(vec![7]);
    assert!(b.snapshot().is_none());
  }
}
