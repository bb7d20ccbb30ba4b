//! Quote Greeter
//!
//! Serves the greeter over HTTP, or invokes it once when given an event file

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use quotegreeter::handlers::{create_router, health, invoke::invoke_from_file};
use quotegreeter::utils::logging::init_logging;
use quotegreeter::{QuoteGreeter, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    health::mark_started();
    let settings = Settings::new().context("Failed to load settings")?;

    init_logging(&settings.logging)?;
    info!("{}", quotegreeter::version_info());

    // One-shot mode: quotegreeter <event.json>
    if let Some(event_file) = std::env::args().nth(1) {
        let greeter = QuoteGreeter::from_settings(&settings);
        let envelope = invoke_from_file(&greeter, Path::new(&event_file)).await?;
        let output = serde_json::to_string(&envelope).context("Failed to serialize envelope")?;
        println!("{}", output);
        return Ok(());
    }

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let endpoint = settings.quote_api.endpoint();
    let app = create_router(settings);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("🚀 Quote greeter started!");
    info!("📝 Health check: http://{}/health", addr);
    info!("💬 Invoke endpoint: http://{}/invoke (quotes from {})", addr, endpoint);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to start server: {}", e))?;

    Ok(())
}
