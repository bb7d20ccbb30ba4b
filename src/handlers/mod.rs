//! HTTP handlers module
//!
//! Exposes the greeter over HTTP the way a function runtime or gateway would

pub mod health;
pub mod invoke;

use crate::config::Settings;
use crate::middleware::logging::request_logging_middleware;
use crate::services::QuoteGreeter;
use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub greeter: QuoteGreeter,
}

/// Create application router
pub fn create_router(settings: Settings) -> Router {
    let greeter = QuoteGreeter::from_settings(&settings);
    router_with_greeter(settings, greeter)
}

/// Create application router around an existing greeter
pub fn router_with_greeter(settings: Settings, greeter: QuoteGreeter) -> Router {
    health::mark_started();
    let app_state = Arc::new(AppState { settings, greeter });

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware));

    Router::new()
        .route("/", get(invoke::handle_gateway))
        .route("/invoke", post(invoke::handle_invoke))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .with_state(app_state)
        .layer(middleware_stack)
}
