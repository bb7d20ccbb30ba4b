//! HTTP client service
//!
//! Encapsulates HTTP communication with the remote quote service

use crate::config::QuoteApiConfig;
use crate::models::QuoteRecord;
use crate::utils::error::{RetrievalFailure, RetrievalResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("quotegreeter/", env!("CARGO_PKG_VERSION"));

/// Source of random quotes
#[async_trait]
pub trait QuoteSource: Send + Sync + std::fmt::Debug {
    /// Fetch one random quote
    async fn fetch_random(&self) -> RetrievalResult<QuoteRecord>;
}

/// Counts per-invocation connections opened and released
#[derive(Debug, Default)]
pub struct ConnectionLedger {
    opened: AtomicUsize,
    released: AtomicUsize,
}

impl ConnectionLedger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Connections opened but not yet released
    pub fn outstanding(&self) -> usize {
        self.opened().saturating_sub(self.released())
    }
}

/// A connection to the quote service owned by a single invocation
///
/// Pooling is disabled so the socket lives no longer than this value.
/// Dropping it releases the connection on every exit path.
pub struct QuoteConnection {
    client: Client,
    endpoint: String,
    ledger: Option<Arc<ConnectionLedger>>,
}

impl QuoteConnection {
    /// Open a connection for one request/response pair
    pub fn open(config: &QuoteApiConfig, ledger: Option<Arc<ConnectionLedger>>) -> RetrievalResult<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(0);

        if let Some(seconds) = config.timeout {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let client = builder.build()?;

        if let Some(ledger) = &ledger {
            ledger.opened.fetch_add(1, Ordering::SeqCst);
        }

        let endpoint = config.endpoint();
        debug!("Opened quote service connection to {}", endpoint);

        Ok(Self { client, endpoint, ledger })
    }

    /// Issue the GET and return the body decoded as UTF-8
    pub async fn fetch_body(&self) -> RetrievalResult<String> {
        let response = self.client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalFailure::status(status));
        }

        let bytes = response.bytes().await?;
        let text = std::str::from_utf8(&bytes)?;

        debug!("Quote service responded with {} bytes", bytes.len());
        Ok(text.to_string())
    }
}

impl Drop for QuoteConnection {
    fn drop(&mut self) {
        if let Some(ledger) = &self.ledger {
            ledger.released.fetch_add(1, Ordering::SeqCst);
        }
        debug!("Released quote service connection to {}", self.endpoint);
    }
}

/// Parse a quote service payload
///
/// The body must be a JSON object with string `content` and `author`.
pub fn parse_quote(text: &str) -> RetrievalResult<QuoteRecord> {
    let map: Map<String, Value> = serde_json::from_str(text)?;
    QuoteRecord::from_map(&map)
}

/// Quote source backed by the remote HTTP API
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    config: QuoteApiConfig,
    ledger: Option<Arc<ConnectionLedger>>,
}

impl HttpQuoteSource {
    /// Create a new source instance
    pub fn new(config: QuoteApiConfig) -> Self {
        Self { config, ledger: None }
    }

    /// Record connection lifecycle on the given ledger
    pub fn with_ledger(mut self, ledger: Arc<ConnectionLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn config(&self) -> &QuoteApiConfig {
        &self.config
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_random(&self) -> RetrievalResult<QuoteRecord> {
        debug!("Fetching random quote from {}", self.config.endpoint());

        let connection = QuoteConnection::open(&self.config, self.ledger.clone())?;
        let body = connection.fetch_body().await?;
        drop(connection);

        parse_quote(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote() {
        let quote = parse_quote(r#"{"_id":"x","content":"Be yourself.","author":"Oscar Wilde","length":12}"#).unwrap();
        assert_eq!(quote.content, "Be yourself.");
        assert_eq!(quote.author, "Oscar Wilde");
    }

    #[test]
    fn test_parse_quote_rejects_non_object() {
        assert!(parse_quote(r#"["Be yourself.", "Oscar Wilde"]"#).is_err());
        assert!(parse_quote("<html>oops</html>").is_err());
        assert!(parse_quote(r#"{"content":"Be yourself."}"#).is_err());
    }

    #[tokio::test]
    async fn test_connection_released_on_drop() {
        let ledger = ConnectionLedger::new();
        let config = QuoteApiConfig::with_base_url("http://127.0.0.1:9");

        let connection = QuoteConnection::open(&config, Some(ledger.clone())).unwrap();
        assert_eq!(ledger.opened(), 1);
        assert_eq!(ledger.outstanding(), 1);

        drop(connection);
        assert_eq!(ledger.released(), 1);
        assert_eq!(ledger.outstanding(), 0);
    }

    #[test]
    fn test_source_keeps_config() {
        let source = HttpQuoteSource::new(QuoteApiConfig::default());
        assert_eq!(source.config().endpoint(), "https://api.quotable.io/random");
    }
}
