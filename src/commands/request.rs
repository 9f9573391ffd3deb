//! Request and reply types.
//!
//! Text commands are whitespace separated and command names are
//! case-insensitive:
//!
//! ```text
//! SET name alice 60
//! GET name
//! DEL name
//! ```

use crate::error::RequestError;
use std::fmt;

/// A single operation against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Create or update a key. `ttl_secs <= 0` means no expiry.
    Set {
        key: String,
        value: String,
        ttl_secs: i64,
    },
    /// Read a key.
    Get { key: String },
    /// Remove a key.
    Delete { key: String },
}

impl Request {
    /// Parses a text command.
    pub fn parse(line: &str) -> Result<Self, RequestError> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().ok_or(RequestError::EmptyCommand)?;
        let args: Vec<&str> = parts.collect();

        match cmd.to_uppercase().as_str() {
            "SET" => {
                let (key, value, ttl) = match args.as_slice() {
                    [key, value] => (key, value, None),
                    [key, value, ttl] => (key, value, Some(ttl)),
                    _ => return Err(RequestError::WrongArity("SET")),
                };
                let ttl_secs = match ttl {
                    Some(ttl) => ttl
                        .parse::<i64>()
                        .map_err(|_| RequestError::InvalidTtl(ttl.to_string()))?,
                    None => 0,
                };
                Ok(Request::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                    ttl_secs,
                })
            }
            "GET" => match args.as_slice() {
                [key] => Ok(Request::Get {
                    key: key.to_string(),
                }),
                _ => Err(RequestError::WrongArity("GET")),
            },
            "DEL" => match args.as_slice() {
                [key] => Ok(Request::Delete {
                    key: key.to_string(),
                }),
                _ => Err(RequestError::WrongArity("DEL")),
            },
            _ => Err(RequestError::UnknownCommand(cmd.to_string())),
        }
    }

    /// Name of the command, for logging.
    pub fn command(&self) -> &'static str {
        match self {
            Request::Set { .. } => "SET",
            Request::Get { .. } => "GET",
            Request::Delete { .. } => "DEL",
        }
    }

    /// The key this request targets.
    pub fn key(&self) -> &str {
        match self {
            Request::Set { key, .. } | Request::Get { key } | Request::Delete { key } => key,
        }
    }
}

/// A successful outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The value was stored.
    Stored,
    /// The key was found.
    Value { key: String, value: String },
    /// The key was removed.
    Deleted,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Stored => write!(f, "Value set successfully"),
            Reply::Value { key, value } => write!(f, "{} = {}", key, value),
            Reply::Deleted => write!(f, "Key deleted"),
        }
    }
}
