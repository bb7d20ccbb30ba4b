//! Data models module
//!
//! Request-scoped values of one invocation: the opaque event, its context,
//! the parsed quote and the returned envelope

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::utils::error::{RetrievalFailure, RetrievalResult};

/// Body error text of every failed invocation
pub const FAILURE_MESSAGE: &str = "Failed to retrieve quote";

/// Opaque trigger payload
///
/// Carried through the handler untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvocationRequest(pub Value);

impl InvocationRequest {
    /// Event without payload
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    /// Build an event from raw bytes
    ///
    /// JSON input is kept as parsed, anything else as a string value.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::empty();
        }

        match serde_json::from_slice(bytes) {
            Ok(value) => Self(value),
            Err(_) => Self(Value::String(String::from_utf8_lossy(bytes).into_owned())),
        }
    }

    /// Raw payload
    pub fn payload(&self) -> &Value {
        &self.0
    }
}

/// Execution context of one invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Request ID (for tracking)
    pub request_id: String,
    /// Invocation timestamp
    pub invoked_at: DateTime<Utc>,
}

impl InvocationContext {
    /// Fresh context with a random request id
    pub fn new() -> Self {
        Self::with_request_id(Uuid::new_v4().to_string())
    }

    /// Context carrying a caller-supplied request id
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            invoked_at: Utc::now(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A quotation returned by the remote quote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Quotation text
    pub content: String,
    /// Attributed author
    pub author: String,
}

impl QuoteRecord {
    /// Extract `content` and `author` from a decoded JSON object
    pub fn from_map(map: &Map<String, Value>) -> RetrievalResult<Self> {
        Ok(Self {
            content: string_field(map, "content")?,
            author: string_field(map, "author")?,
        })
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> RetrievalResult<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RetrievalFailure::missing_field(key))
}

/// Value returned to the invoker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// HTTP-style status code
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded body
    pub body: String,
}

/// Success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Failure body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ResponseEnvelope {
    /// 200 envelope carrying `{"message": ...}`
    pub fn success(message: impl Into<String>) -> Self {
        let body = MessageBody {
            message: message.into(),
        };
        Self {
            status_code: 200,
            body: encode_body(&body),
        }
    }

    /// 500 envelope carrying the generic error
    pub fn failure() -> Self {
        let body = ErrorBody {
            error: FAILURE_MESSAGE.to_string(),
        };
        Self {
            status_code: 500,
            body: encode_body(&body),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

fn encode_body<T: Serialize>(body: &T) -> String {
    serde_json::to_string(body)
        .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, FAILURE_MESSAGE))
}
