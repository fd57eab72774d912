//! # Static Principal Cache
//!
//! Bounded record of principal names already proven *not* dynamic.
//!
//! ## Invariant
//!
//! Presence is a monotonic fact: once a name is recorded static it stays
//! static until evicted. There is no invalidation. Principals are expected
//! to have their `dynamic` marker set before they appear in any ACL, and the
//! marker is not changed afterwards. Eviction under capacity pressure only
//! costs a repeat directory lookup; the re-derived classification is the
//! same.
//!
//! One instance is shared by every evaluation in the process. The LRU is
//! behind a `parking_lot::Mutex` because even a read updates recency.

use std::num::NonZeroUsize;

use dynacl_core::PrincipalName;
use lru::LruCache;
use parking_lot::Mutex;

/// Default number of static principals retained.
pub const DEFAULT_STATIC_CACHE_CAPACITY: usize = 1000;

/// Thread-safe, capacity-bounded set of static principal names.
pub struct StaticPrincipalCache {
    entries: Mutex<LruCache<PrincipalName, ()>>,
}

impl StaticPrincipalCache {
    /// Create an empty cache holding at most `capacity` names.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Whether `name` is known static. A hit refreshes its recency.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().get(name).is_some()
    }

    /// Record `name` as static. Idempotent.
    pub fn mark_static(&self, name: &PrincipalName) {
        self.entries.lock().put(name.clone(), ());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.entries.lock().cap()
    }
}

impl Default for StaticPrincipalCache {
    fn default() -> Self {
        Self::new(NonZeroUsize::new(DEFAULT_STATIC_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN))
    }
}

impl std::fmt::Debug for StaticPrincipalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("StaticPrincipalCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
