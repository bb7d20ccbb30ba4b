//! Quote Greeter Library
//!
//! A cloud function handler that greets callers with a random quote

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, AppState};
pub use models::{InvocationContext, InvocationRequest, QuoteRecord, ResponseEnvelope};
pub use services::{HttpQuoteSource, QuoteGreeter, QuoteSource};
pub use utils::error::{RetrievalFailure, RetrievalResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
