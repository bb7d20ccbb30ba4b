//! Error handling module
//!
//! Defines the single failure kind of a quote retrieval

use reqwest::StatusCode;
use std::fmt::{Debug, Display};
use thiserror::Error;

/// Any failure while retrieving a quote
///
/// Connection, transport, decoding, parsing and missing-field failures all
/// collapse into this one type. The cause is kept for logging only.
#[derive(Error, Debug)]
#[error("Failed to retrieve quote: {cause:#}")]
pub struct RetrievalFailure {
    cause: anyhow::Error,
}

impl RetrievalFailure {
    /// Wrap an underlying cause
    pub fn new(cause: impl Into<anyhow::Error>) -> Self {
        Self { cause: cause.into() }
    }

    /// Create a failure from a plain message
    pub fn msg(message: impl Display + Debug + Send + Sync + 'static) -> Self {
        Self {
            cause: anyhow::Error::msg(message),
        }
    }

    /// Remote answered with a non-success status
    pub fn status(status: StatusCode) -> Self {
        Self::msg(format!("quote service responded with status {}", status))
    }

    /// Payload lacks a string field
    pub fn missing_field(key: &str) -> Self {
        Self::msg(format!("quote payload has no string field `{}`", key))
    }

    /// Underlying cause
    pub fn cause(&self) -> &anyhow::Error {
        &self.cause
    }
}

impl From<reqwest::Error> for RetrievalFailure {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

impl From<serde_json::Error> for RetrievalFailure {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}

impl From<std::str::Utf8Error> for RetrievalFailure {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::new(err)
    }
}

/// Result type alias
pub type RetrievalResult<T> = Result<T, RetrievalFailure>;
