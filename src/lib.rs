//! # TTLKV - A Concurrent In-Memory Key-Value Store with TTL
//!
//! TTLKV maps string keys to string values, with an optional time-to-live per
//! key. Expired keys stop being visible the moment their TTL runs out, and a
//! background sweeper reclaims them shortly after.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                            TTLKV                              │
//! │                                                               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │  Front-end  │───>│  Command    │───>│     KvStore      │   │
//! │  │  (stdin)    │    │  Handler    │    │ get/set/del/stop │   │
//! │  └─────────────┘    └─────────────┘    └────────┬─────────┘   │
//! │                                                 │             │
//! │                                                 ▼             │
//! │                     ┌───────────────────────────────────────┐ │
//! │                     │            StorageEngine              │ │
//! │                     │   RwLock<HashMap<String, Entry>>      │ │
//! │                     └───────────────────────────────────────┘ │
//! │                                                 ▲             │
//! │                     ┌───────────────────────────┴───────────┐ │
//! │                     │            ExpirySweeper              │ │
//! │                     │       (Background Tokio Task)         │ │
//! │                     └───────────────────────────────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use ttlkv::{KvStore, StoreConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ttlkv::StoreError> {
//! let store = KvStore::start(StoreConfig::default())?;
//!
//! store.set("a", "1", 0); // never expires
//! store.set("b", "2", 1); // expires in one second
//!
//! assert_eq!(store.get("a"), Some("1".to_string()));
//! assert!(store.delete("a"));
//!
//! store.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ## Lazy + Active Expiry
//!
//! Keys with TTL are expired in two ways:
//! 1. **Lazy**: reads treat a key as absent once `now >= expires_at`
//! 2. **Active**: a background task periodically removes expired keys
//!
//! Both use the same clock and the same inclusive comparison, so they never
//! disagree about whether a key is expired.
//!
//! ## Module Overview
//!
//! - [`store`]: The [`KvStore`] facade
//! - [`storage`]: Thread-safe storage engine and expiry sweeper
//! - [`commands`]: Request parsing and dispatch
//! - [`config`]: Store configuration
//! - [`error`]: Error types

pub mod commands;
pub mod config;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types for convenience
pub use commands::{CommandHandler, Reply, Request};
pub use config::StoreConfig;
pub use error::{ConfigError, RequestError, StoreError};
pub use storage::{ExpirySweeper, StorageEngine};
pub use store::KvStore;

/// Version of TTLKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
