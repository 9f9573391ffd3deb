//! Command Handler
//!
//! Executes [`Request`]s against a shared [`KvStore`] and maps the store's
//! "absent" results to [`RequestError::KeyNotFound`].
//!
//! ## Outcomes
//!
//! | Request  | Store call          | Reply                         |
//! |----------|---------------------|-------------------------------|
//! | `SET`    | `set(k, v, ttl)`    | always `Stored`               |
//! | `GET`    | `get(k)`            | `Value`, or `KeyNotFound`     |
//! | `DEL`    | `delete(k)`         | `Deleted`, or `KeyNotFound`   |
//!
//! Every request is logged at info level with its duration.

use crate::commands::{Reply, Request};
use crate::error::RequestError;
use crate::store::KvStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Dispatches requests to the store.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    store: Arc<KvStore>,
}

impl CommandHandler {
    /// Creates a new command handler for the given store.
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Parses a text command and executes it.
    pub fn execute_line(&self, line: &str) -> Result<Reply, RequestError> {
        self.handle(Request::parse(line)?)
    }

    /// Parses a raw input line and executes it.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
    /// rejecting the whole line.
    pub fn execute_bytes(&self, line: &[u8]) -> Result<Reply, RequestError> {
        self.execute_line(&String::from_utf8_lossy(line))
    }

    /// Executes a request and returns the reply.
    pub fn handle(&self, request: Request) -> Result<Reply, RequestError> {
        let start = Instant::now();
        let command = request.command();
        let result = self.dispatch(request);

        info!(
            command = command,
            ok = result.is_ok(),
            duration_us = start.elapsed().as_micros() as u64,
            "Request"
        );

        result
    }

    fn dispatch(&self, request: Request) -> Result<Reply, RequestError> {
        if request.key().is_empty() {
            return Err(RequestError::EmptyKey);
        }

        match request {
            Request::Set {
                key,
                value,
                ttl_secs,
            } => {
                self.store.set(key, value, ttl_secs);
                Ok(Reply::Stored)
            }
            Request::Get { key } => match self.store.get(&key) {
                Some(value) => Ok(Reply::Value { key, value }),
                None => Err(RequestError::KeyNotFound),
            },
            Request::Delete { key } => {
                if self.store.delete(&key) {
                    Ok(Reply::Deleted)
                } else {
                    Err(RequestError::KeyNotFound)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn create_handler() -> CommandHandler {
        let store = KvStore::start(StoreConfig::default()).unwrap();
        CommandHandler::new(Arc::new(store))
    }

    #[tokio::test]
    async fn test_set_get() {
        let handler = create_handler();

        assert_eq!(handler.execute_line("SET username joe"), Ok(Reply::Stored));
        assert_eq!(
            handler.execute_line("GET username"),
            Ok(Reply::Value {
                key: "username".to_string(),
                value: "joe".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let handler = create_handler();

        assert_eq!(
            handler.execute_line("GET nonexistent"),
            Err(RequestError::KeyNotFound)
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let handler = create_handler();

        assert_ok!(handler.execute_line("SET username joe"));
        assert_eq!(handler.execute_line("DEL username"), Ok(Reply::Deleted));
        assert_eq!(
            handler.execute_line("DEL username"),
            Err(RequestError::KeyNotFound)
        );
        assert_err!(handler.execute_line("GET username"));
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let handler = create_handler();

        let request = Request::Set {
            key: String::new(),
            value: "v".to_string(),
            ttl_secs: 0,
        };
        assert_eq!(handler.handle(request), Err(RequestError::EmptyKey));
        assert_eq!(
            handler.handle(Request::Get { key: String::new() }),
            Err(RequestError::EmptyKey)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_with_ttl() {
        let handler = create_handler();

        assert_ok!(handler.execute_line("SET session abc 1"));
        assert_ok!(handler.execute_line("GET session"));

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(
            handler.execute_line("GET session"),
            Err(RequestError::KeyNotFound)
        );
    }

    #[tokio::test]
    async fn test_max_ttl_accepted() {
        let handler = create_handler();

        assert_eq!(
            handler.execute_line("SET k v 9223372036854775807"),
            Ok(Reply::Stored)
        );
        assert_ok!(handler.execute_line("GET k"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_handled() {
        let handler = create_handler();

        assert_eq!(handler.execute_bytes(b"SET k caf\xff\n"), Ok(Reply::Stored));
        assert_eq!(
            handler.execute_bytes(b"GET k"),
            Ok(Reply::Value {
                key: "k".to_string(),
                value: "caf\u{FFFD}".to_string()
            })
        );
        assert_eq!(
            handler.execute_bytes(b"\xff\xfe"),
            Err(RequestError::UnknownCommand("\u{FFFD}\u{FFFD}".to_string()))
        );
    }

    #[tokio::test]
    async fn test_parse_error_propagates() {
        let handler = create_handler();

        assert_eq!(
            handler.execute_line("PING"),
            Err(RequestError::UnknownCommand("PING".to_string()))
        );
    }
}
