//! Invocation handlers
//!
//! Run the greeter for an HTTP request or an event file

use crate::handlers::AppState;
use crate::models::{InvocationContext, InvocationRequest, ResponseEnvelope};
use crate::services::QuoteGreeter;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Invoke the function
///
/// POST /invoke
///
/// The request body is the event. The envelope itself is the response payload.
pub async fn handle_invoke(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ResponseEnvelope> {
    let request = InvocationRequest::from_bytes(&body);
    let context = InvocationContext::new();
    debug!("Invoking greeter, request id {}", context.request_id);

    Json(state.greeter.handle(&request, &context).await)
}

/// Gateway-style invocation
///
/// GET /
///
/// The envelope is unwrapped into the HTTP status and body.
pub async fn handle_gateway(State(state): State<Arc<AppState>>) -> Response {
    let context = InvocationContext::new();
    state
        .greeter
        .handle(&InvocationRequest::empty(), &context)
        .await
        .into_response()
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

/// Invoke once against an event read from a file
pub async fn invoke_from_file(greeter: &QuoteGreeter, path: &Path) -> Result<ResponseEnvelope> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read event file: {:?}", path))?;

    let request = InvocationRequest::from_bytes(&data);
    let context = InvocationContext::new();
    Ok(greeter.handle(&request, &context).await)
}
