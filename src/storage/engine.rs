//! Thread-Safe Storage Engine with Expiry Support
//!
//! This module implements the core storage engine for TTLKV.
//! It provides a thread-safe HashMap of string keys to string values,
//! each with an optional absolute expiry instant.
//!
//! ## Design Decisions
//!
//! 1. **One entry per key**: value and expiry live together in [`Entry`], so a
//!    key can never carry an expiry record without a value (or vice versa).
//! 2. **Lazy visibility**: reads treat expired entries as absent, but never
//!    remove them. Removal is the job of the background sweeper.
//! 3. **RwLock**: many concurrent readers, one exclusive writer.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                StorageEngine                 │
//! │   ┌──────────────────────────────────────┐   │
//! │   │ RwLock<HashMap<String, Entry>>       │   │
//! │   │   get ──────────────► read lock      │   │
//! │   │   set / delete ─────► write lock     │   │
//! │   │   cleanup_expired ──► write lock     │   │
//! │   └──────────────────────────────────────┘   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Time comes from [`tokio::time::Instant`], which is the plain monotonic
//! clock in production and can be paused in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::time::Instant;

/// Represents a stored value with optional expiry time.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The actual value stored
    pub value: String,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
    /// When this entry was last written
    pub created_at: Instant,
}

impl Entry {
    /// Creates a new entry without expiry.
    pub fn new(value: String) -> Self {
        Self {
            value,
            expires_at: None,
            created_at: Instant::now(),
        }
    }

    /// Creates a new entry with TTL.
    ///
    /// A TTL too large to represent as an instant can never elapse, so the
    /// entry is stored without expiry.
    pub fn with_ttl(value: String, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            expires_at: now.checked_add(ttl),
            created_at: now,
        }
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks if this entry has expired as of `now`.
    ///
    /// The expiry instant itself already counts as expired.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    /// Returns the remaining time to live, or None if no expiry.
    pub fn ttl(&self) -> Option<Duration> {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(Instant::now()))
    }
}

/// The main storage engine for TTLKV.
///
/// This struct is designed to be wrapped in an `Arc` and shared between
/// request handlers and the expiry sweeper. All operations are thread-safe
/// and none of them can fail.
///
/// # Example
///
/// ```
/// use ttlkv::storage::StorageEngine;
/// use std::time::Duration;
///
/// let engine = StorageEngine::new();
///
/// engine.set("name".to_string(), "alice".to_string());
/// assert_eq!(engine.get("name"), Some("alice".to_string()));
///
/// engine.set_with_ttl("session".to_string(), "abc123".to_string(), Duration::from_secs(60));
/// assert!(engine.exists("session"));
/// ```
pub struct StorageEngine {
    data: RwLock<HashMap<String, Entry>>,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total SET operations
    set_count: AtomicU64,

    /// Statistics: total DEL operations
    del_count: AtomicU64,

    /// Statistics: number of expired keys cleaned up
    expired_count: AtomicU64,
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("keys", &self.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine {
    /// Creates a new, empty storage engine.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is safe to keep using.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, key: String, entry: Entry) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);
        self.write().insert(key, entry).is_none()
    }

    /// Sets a key-value pair without expiry.
    ///
    /// If the key already exists, its value is overwritten and any previous
    /// expiry is dropped.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if an existing key was updated.
    pub fn set(&self, key: String, value: String) -> bool {
        self.insert(key, Entry::new(value))
    }

    /// Sets a key-value pair that expires `ttl` from now.
    ///
    /// Any previous expiry for the key is replaced.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if an existing key was updated.
    pub fn set_with_ttl(&self, key: String, value: String, ttl: Duration) -> bool {
        self.insert(key, Entry::with_ttl(value, ttl))
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist or has expired. Expired entries
    /// are left in place for the sweeper; this call only takes a read lock.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        self.read()
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    /// Gets the full entry for a key (including metadata), if it is still live.
    pub fn get_entry(&self, key: &str) -> Option<Entry> {
        self.read()
            .get(key)
            .filter(|entry| !entry.is_expired())
            .cloned()
    }

    /// Checks if a key exists (and is not expired).
    pub fn exists(&self, key: &str) -> bool {
        self.read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Deletes a key and its expiry.
    ///
    /// # Returns
    ///
    /// Returns `true` if the key was present, even if it had already expired
    /// but not yet been swept. Returns `false` otherwise.
    pub fn delete(&self, key: &str) -> bool {
        self.del_count.fetch_add(1, Ordering::Relaxed);
        self.write().remove(key).is_some()
    }

    /// Returns the number of stored entries, including expired entries the
    /// sweeper has not reclaimed yet.
    pub fn len(&self) -> u64 {
        self.read().len() as u64
    }

    /// Returns true if the engine holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns engine statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len(),
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }

    /// Removes every entry whose expiry instant is at or before now.
    ///
    /// This is one sweep pass; the background sweeper calls it on each tick.
    ///
    /// # Returns
    ///
    /// Returns the number of keys that were cleaned up.
    pub fn cleanup_expired(&self) -> u64 {
        let now = Instant::now();
        let mut data = self.write();
        let before = data.len();

        data.retain(|_, entry| !entry.is_expired_at(now));

        let cleaned = (before - data.len()) as u64;
        if cleaned > 0 {
            self.expired_count.fetch_add(cleaned, Ordering::Relaxed);
        }

        cleaned
    }
}

/// Engine statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    pub keys: u64,
    pub get_ops: u64,
    pub set_ops: u64,
    pub del_ops: u64,
    pub expired: u64,
}
