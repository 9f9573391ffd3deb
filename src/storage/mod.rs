//! Storage Engine Module
//!
//! This module provides the core storage functionality for TTLKV:
//! a thread-safe key-value map with TTL support and a background
//! expiry sweeper.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │             StorageEngine             │
//! │   RwLock<HashMap<String, Entry>>      │
//! └───────────────────────────────────────┘
//!                    ▲
//!                    │ cleanup_expired() every tick
//!      ┌─────────────┴─────────────┐
//!      │       ExpirySweeper       │
//!      │  (Background Tokio Task)  │
//!      └───────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **RwLock**: Multiple concurrent readers, exclusive writers
//! - **TTL Support**: Keys can have time-to-live expiry
//! - **Lazy Visibility**: Expired keys read as absent before they are swept
//! - **Active Expiry**: Background sweeper reclaims expired keys
//!
//! ## Example
//!
//! ```
//! use ttlkv::storage::StorageEngine;
//! use std::time::Duration;
//!
//! let engine = StorageEngine::new();
//!
//! engine.set("name".to_string(), "alice".to_string());
//! assert_eq!(engine.get("name"), Some("alice".to_string()));
//!
//! engine.set_with_ttl(
//!     "session".to_string(),
//!     "token123".to_string(),
//!     Duration::from_secs(3600),
//! );
//! ```

pub mod engine;
pub mod expiry;

// Re-export commonly used types
pub use engine::{Entry, StorageEngine, StorageStats};
pub use expiry::{start_expiry_sweeper, ExpirySweeper};
