//! Logging utilities
//!
//! Tracing subscriber setup shared by the server and one-shot modes

use crate::config::LoggingConfig;
use anyhow::Result;
use tracing::info;

/// Initialize logging system
///
/// Logs go to stderr; stdout carries only the one-shot envelope.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs (production environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(config.level.clone())
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(false)
            .with_span_list(false)
            .finish())
    } else {
        // Human readable format (development environment)
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(config.level.clone())
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish())
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    Ok(())
}
