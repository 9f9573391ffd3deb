//! Error types for TTLKV.
//!
//! The store operations themselves never fail; a missing key is reported as
//! `None`/`false`. Errors only arise when starting a store and when turning
//! client input into requests.

use thiserror::Error;

/// Invalid store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("sweep interval must be greater than zero")]
    ZeroSweepInterval,
}

/// Errors from starting a [`KvStore`](crate::KvStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("the expiry sweeper must be started from within a Tokio runtime")]
    NoRuntime,
}

/// Errors from parsing or handling a client request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Invalid request: empty command")]
    EmptyCommand,

    #[error("Invalid request: unknown command '{0}'")]
    UnknownCommand(String),

    #[error("Invalid request: wrong number of arguments for '{0}'")]
    WrongArity(&'static str),

    #[error("Invalid request: ttl must be an integer, got '{0}'")]
    InvalidTtl(String),

    #[error("Invalid request: key must not be empty")]
    EmptyKey,

    #[error("Key not found")]
    KeyNotFound,
}
