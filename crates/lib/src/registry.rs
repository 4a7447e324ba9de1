//! Per-collection lock registry.
//!
//! Every mutating store operation serializes on a mutex dedicated to its
//! collection. The registry hands those mutexes out: the first request for a
//! name creates the mutex, every later request returns the same one.
//!
//! The registry's own guard covers only the lookup/insert. It is released
//! before the caller locks the returned collection mutex, so a long write in
//! one collection never stalls lock lookups for another.
//!
//! Entries are never evicted. The map grows with the number of distinct
//! collection names touched over the store's lifetime.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::store::StoreError;

/// A collection mutex shared between all callers of one collection.
pub type CollectionLock = Arc<Mutex<()>>;

/// Maps collection names to their mutexes.
#[derive(Debug, Default)]
pub struct LockRegistry {
  locks: Mutex<HashMap<String, CollectionLock>>,
}

impl LockRegistry {
  /// Create an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the lock for `collection`, creating it on first use.
  ///
  /// Concurrent callers asking for the same name always receive the same
  /// `Arc`. Fails only if the registry guard was poisoned.
  pub fn acquire(&self, collection: &str) -> Result<CollectionLock, StoreError> {
    let mut locks = self.locks.lock().map_err(|_| StoreError::LockPoisoned {
      collection: collection.to_string(),
    })?;

    if let Some(lock) = locks.get(collection) {
      return Ok(Arc::clone(lock));
    }

    debug!(collection, "creating collection lock");
    let lock = CollectionLock::default();
    locks.insert(collection.to_string(), Arc::clone(&lock));
    Ok(lock)
  }

  /// Number of collections that have a lock.
  pub fn len(&self) -> usize {
    self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  /// Whether no collection lock has been created yet.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Whether a lock exists for `collection`.
  pub fn contains(&self, collection: &str) -> bool {
    self
      .locks
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains_key(collection)
  }
}

/// Lock a collection mutex for the duration of a mutation.
///
/// The mutex guards no data, so a poisoned lock (a previous holder panicked)
/// is recovered rather than propagated.
pub fn lock_collection<'a>(lock: &'a CollectionLock, collection: &str) -> MutexGuard<'a, ()> {
  lock.lock().unwrap_or_else(|poisoned| {
    warn!(collection, "recovering poisoned collection lock");
    poisoned.into_inner()
  })
}
