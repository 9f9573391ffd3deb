//! The expiring key-value store.
//!
//! [`KvStore`] ties a [`StorageEngine`] to its [`ExpirySweeper`] and exposes
//! the four operations callers depend on: `get`, `set`, `delete` and
//! `shutdown`.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::storage::{start_expiry_sweeper, ExpirySweeper, StorageEngine, StorageStats};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::info;

/// A concurrent in-memory string store with per-key TTL.
///
/// Create it once at startup with [`KvStore::start`] and share it behind an
/// `Arc`. Call [`KvStore::shutdown`] to stop background expiry; the store
/// remains usable afterwards.
///
/// # Example
///
/// ```
/// use ttlkv::{KvStore, StoreConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), ttlkv::StoreError> {
/// let store = KvStore::start(StoreConfig::default())?;
///
/// store.set("a", "1", 0);
/// assert_eq!(store.get("a"), Some("1".to_string()));
///
/// assert!(store.delete("a"));
/// assert!(!store.delete("a"));
///
/// store.shutdown();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct KvStore {
    engine: Arc<StorageEngine>,
    sweeper: ExpirySweeper,
}

impl KvStore {
    /// Creates an empty store and starts its background sweeper.
    ///
    /// # Errors
    ///
    /// Fails if `config` is invalid or if called outside a Tokio runtime.
    pub fn start(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        Handle::try_current().map_err(|_| StoreError::NoRuntime)?;

        let engine = Arc::new(StorageEngine::new());
        let sweeper = start_expiry_sweeper(Arc::clone(&engine), &config);

        Ok(Self { engine, sweeper })
    }

    /// Returns the value for `key` if it exists and has not expired.
    pub fn get(&self, key: &str) -> Option<String> {
        self.engine.get(key)
    }

    /// Inserts or overwrites `key`.
    ///
    /// A positive `ttl_secs` makes the entry expire that many seconds from
    /// now. Zero or a negative value stores it without expiry, dropping any
    /// expiry the key had before.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>, ttl_secs: i64) {
        let (key, value) = (key.into(), value.into());
        match u64::try_from(ttl_secs) {
            Ok(secs) if secs > 0 => {
                self.engine.set_with_ttl(key, value, Duration::from_secs(secs));
            }
            _ => {
                self.engine.set(key, value);
            }
        }
    }

    /// Removes `key`. Returns `true` if it was present, including entries
    /// that have expired but have not been swept yet.
    pub fn delete(&self, key: &str) -> bool {
        self.engine.delete(key)
    }

    /// Stops the background sweeper. Safe to call repeatedly.
    ///
    /// Entries are kept and the other operations keep working; expired
    /// entries simply stop being reclaimed.
    pub fn shutdown(&self) {
        if !self.sweeper.is_stopped() {
            info!(keys = self.engine.len(), "Shutting down store");
        }
        self.sweeper.stop();
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.sweeper.is_stopped()
    }

    /// Returns engine statistics.
    pub fn stats(&self) -> StorageStats {
        self.engine.stats()
    }

    /// Returns the underlying engine.
    pub fn engine(&self) -> &Arc<StorageEngine> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    async fn store() -> KvStore {
        KvStore::start(StoreConfig::default()).unwrap()
    }

    #[test]
    fn test_start_requires_runtime() {
        let err = KvStore::start(StoreConfig::default()).unwrap_err();
        assert!(matches!(err, StoreError::NoRuntime));
    }

    #[tokio::test]
    async fn test_start_rejects_zero_interval() {
        let config = StoreConfig::default().with_sweep_interval(Duration::ZERO);
        let err = KvStore::start(config).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unset_key_is_absent() {
        let store = store().await;
        assert_eq!(store.get("never-set"), None);
        assert_eq!(store.get(""), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_ttl_never_expires() {
        let store = store().await;

        store.set("zero", "v0", 0);
        store.set("negative", "v1", -5);

        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert_eq!(store.get("zero"), Some("v0".to_string()));
        assert_eq!(store.get("negative"), Some("v1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_positive_ttl_expires() {
        let store = store().await;

        store.set("b", "2", 1);
        assert_eq!(store.get("b"), Some("2".to_string()));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(store.get("b"), None);
        // The sweep at +1s already reclaimed it
        assert!(!store.delete("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_visible_before_next_tick() {
        let store = store().await;

        // Set halfway between ticks so expiry lands before the next sweep
        tokio::time::sleep(Duration::from_millis(500)).await;
        store.set("k", "v", 1);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(store.get("k"), Some("v".to_string()));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(store.get("k"), None);
        assert_eq!(store.engine().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_clears_stale_ttl() {
        let store = store().await;

        store.set("k", "v1", 1);
        tokio::time::sleep(Duration::from_millis(500)).await;
        store.set("k", "v2", 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.get("k"), Some("v2".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_with_negative_ttl_clears_stale_ttl() {
        let store = store().await;

        store.set("k", "v1", 1);
        store.set("k", "v2", -1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.get("k"), Some("v2".to_string()));
        assert_eq!(store.stats().expired, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_ttl_is_accepted() {
        let store = store().await;

        store.set("k", "v", i64::MAX);
        assert_eq!(store.get("k"), Some("v".to_string()));

        tokio::time::sleep(Duration::from_secs(3600)).await;
        assert_eq!(store.get("k"), Some("v".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end() {
        let store = store().await;

        store.set("a", "1", 0);
        assert_eq!(store.get("a"), Some("1".to_string()));

        store.set("b", "2", 1);
        assert_eq!(store.get("b"), Some("2".to_string()));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(store.get("b"), None);

        assert!(store.delete("a"));
        assert_eq!(store.get("a"), None);
        assert!(!store.delete("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_operations_after_shutdown() {
        let store = store().await;

        store.shutdown();
        store.shutdown();
        assert!(store.is_shut_down());

        store.set("k", "v", 1);
        assert_eq!(store.get("k"), Some("v".to_string()));

        tokio::time::sleep(Duration::from_secs(5)).await;

        // Hidden by the read path, but no longer reclaimed
        assert_eq!(store.get("k"), None);
        assert_eq!(store.engine().len(), 1);
        assert!(store.delete("k"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_disjoint_keys() {
        let store = Arc::new(store().await);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let mut expected = None;
                    for i in 0..1000 {
                        let key = format!("t{}", t);
                        match i % 4 {
                            0 | 1 => {
                                let value = format!("{}-{}", t, i);
                                store.set(key.as_str(), value.as_str(), 0);
                                expected = Some(value);
                            }
                            2 => assert_eq!(store.get(&key), expected),
                            _ => {
                                if i % 8 == 3 {
                                    assert_eq!(store.delete(&key), expected.is_some());
                                    expected = None;
                                }
                            }
                        }
                    }
                    expected
                })
            })
            .collect();

        for (t, handle) in handles.into_iter().enumerate() {
            let expected = handle.join().unwrap();
            assert_eq!(store.get(&format!("t{}", t)), expected);
        }

        store.shutdown();
    }
}
