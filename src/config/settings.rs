//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing_subscriber::EnvFilter;

/// Default remote quote service
pub const DEFAULT_QUOTE_API_BASE_URL: &str = "https://api.quotable.io";

/// Default path of the random quote endpoint
pub const DEFAULT_QUOTE_API_PATH: &str = "/random";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Server configuration
    pub server: ServerConfig,
    /// Remote quote service configuration
    pub quote_api: QuoteApiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Remote quote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteApiConfig {
    /// Base URL of the quote service
    pub base_url: String,
    /// Path of the random quote endpoint
    pub path: String,
    /// Request timeout in seconds, transport default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Default for QuoteApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_QUOTE_API_BASE_URL.to_string(),
            path: DEFAULT_QUOTE_API_PATH.to_string(),
            timeout: None,
        }
    }
}

impl QuoteApiConfig {
    /// Config pointing at another base URL, keeping the default path
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Full URL of the random quote endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directives, e.g. `info` or `quotegreeter=debug,tower_http=info`
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Settings {
    /// Create a new configuration instance
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let timeout = match env::var("QUOTE_API_TIMEOUT") {
            Ok(value) if !value.trim().is_empty() => Some(
                value
                    .trim()
                    .parse()
                    .context("Invalid quote API timeout value")?,
            ),
            _ => None,
        };

        let settings = Self {
            server: ServerConfig {
                host: get_env_or_default("SERVER_HOST", "0.0.0.0"),
                port: get_env_or_default("SERVER_PORT", "8080")
                    .parse()
                    .context("Invalid port number")?,
            },
            quote_api: QuoteApiConfig {
                base_url: get_env_or_default("QUOTE_API_BASE_URL", DEFAULT_QUOTE_API_BASE_URL),
                path: get_env_or_default("QUOTE_API_PATH", DEFAULT_QUOTE_API_PATH),
                timeout,
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Port number cannot be 0");
        }

        if !self.quote_api.base_url.starts_with("http") {
            anyhow::bail!("Invalid quote API base URL format, should start with 'http'");
        }

        if !self.quote_api.path.starts_with('/') {
            anyhow::bail!("Invalid quote API path, should start with '/'");
        }

        if self.quote_api.timeout == Some(0) {
            anyhow::bail!("Timeout value cannot be 0");
        }

        if EnvFilter::try_new(&self.logging.level).is_err() {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
