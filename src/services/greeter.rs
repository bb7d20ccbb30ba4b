//! Quote greeter
//!
//! The function handler: one quote fetch per invocation, mapped onto a
//! success or failure envelope

use crate::config::Settings;
use crate::models::{InvocationContext, InvocationRequest, QuoteRecord, ResponseEnvelope};
use crate::services::client::{HttpQuoteSource, QuoteSource};
use std::sync::Arc;
use tracing::{debug, error, info_span, Instrument};

/// Greets callers with a random quote
#[derive(Debug, Clone)]
pub struct QuoteGreeter {
    source: Arc<dyn QuoteSource>,
}

impl QuoteGreeter {
    /// Create a greeter over any quote source
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Create a greeter backed by the configured HTTP quote service
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(Arc::new(HttpQuoteSource::new(settings.quote_api.clone())))
    }

    /// Handle one invocation
    ///
    /// The event and context are not inspected. Every retrieval failure
    /// yields the same 500 envelope; the cause is only logged.
    pub async fn handle(
        &self,
        _request: &InvocationRequest,
        context: &InvocationContext,
    ) -> ResponseEnvelope {
        let span = info_span!("invocation", request_id = %context.request_id);

        async {
            match self.source.fetch_random().await {
                Ok(quote) => {
                    debug!("Retrieved quote by {}", quote.author);
                    ResponseEnvelope::success(compose_message(&quote))
                }
                Err(e) => {
                    error!("{}", e);
                    ResponseEnvelope::failure()
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Greeting text for a quote
pub fn compose_message(quote: &QuoteRecord) -> String {
    format!(
        "Hello World! Here's a random quote for you:\n\"{}\"\n- {}",
        quote.content, quote.author
    )
}
