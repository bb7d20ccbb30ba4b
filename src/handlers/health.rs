//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::debug;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Check result
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDetails {
    /// Configured quote service endpoint
    pub quote_api: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}

/// Basic health check
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: Some(HealthDetails {
            quote_api: state.settings.quote_api.endpoint(),
            uptime_seconds: get_uptime_seconds(),
        }),
    })
}

/// Liveness check
///
/// GET /health/live
/// Does not contact the quote service
pub async fn liveness_check(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing liveness check");

    Json(HealthResponse {
        status: "alive".to_string(),
        service: crate::NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        details: None,
    })
}

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the service start instant; later calls keep the first one
pub fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

/// Get service uptime in seconds
fn get_uptime_seconds() -> u64 {
    START_TIME.get_or_init(Instant::now).elapsed().as_secs()
}
