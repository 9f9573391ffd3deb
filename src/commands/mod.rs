//! Command Handler Module
//!
//! This module is the request layer in front of the store. Front-ends turn
//! client input into a [`Request`], hand it to a [`CommandHandler`], and render
//! the resulting [`Reply`] or [`RequestError`](crate::error::RequestError).
//!
//! ## Architecture
//!
//! ```text
//! Client input
//!       │
//!       ▼
//! ┌─────────────────┐
//! │ Request::parse  │  (request module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (handler module)
//! │  - Validate     │
//! │  - Execute      │
//! │  - Log          │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    KvStore      │  (store module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `SET key value [ttl-seconds]` - Insert or overwrite a key
//! - `GET key` - Read a key
//! - `DEL key` - Remove a key

pub mod handler;
pub mod request;

pub use handler::CommandHandler;
pub use request::{Reply, Request};
