//! Cache capability
//!
//! Key-value lookaside with absolute expiry. Values are type-erased so one
//! cache serves every result type; the cache-aside decorator downcasts on the
//! way out and treats a wrong-typed or expired entry as a miss. A cache
//! failure is never allowed to fail an operation.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// Type-erased cached value
pub type CacheValue = Arc<dyn Any + Send + Sync>;

/// Lookaside cache with absolute expiry
pub trait Cache: Send + Sync {
    /// Look up a live entry; expired entries behave as absent
    fn lookup(&self, key: &str, now: SystemTime) -> Option<CacheValue>;

    /// Store a value that expires at the given instant
    ///
    /// Overwrites any existing entry under the key.
    fn store(&self, key: &str, value: CacheValue, expires_at: SystemTime);
}

/// In-process cache backed by a mutex-guarded map
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (CacheValue, SystemTime)>>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        MemoryCache {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of entries, live or expired (test convenience)
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries (test convenience)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (CacheValue, SystemTime)>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => panic!("memory cache mutex poisoned: {}", poisoned),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl Cache for MemoryCache {
    fn lookup(&self, key: &str, now: SystemTime) -> Option<CacheValue> {
        let mut entries = self.lock();
        let expired = matches!(entries.get(key), Some((_, expires_at)) if *expires_at <= now);
        if expired {
            // Expired entries are evicted on the lookup that finds them
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|(value, _)| Arc::clone(value))
    }

    fn store(&self, key: &str, value: CacheValue, expires_at: SystemTime) {
        self.lock().insert(key.to_string(), (value, expires_at));
    }
}
