use serde::Serialize;
use serde_json::{json, Value};

use super::ApiError;

/// Message placed in the envelope when no HTTP response was obtained
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

/// The normalized result of every API call, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub ok: bool,
    /// HTTP status, or 0 when the request never got a response
    pub status: u16,
    /// Parsed JSON for JSON responses, the body text otherwise
    pub data: Value,
}

/// How an envelope should be treated by observers and callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// HTTP 401; the session is no longer valid
    Unauthorized,
    /// Any other non-2xx status
    Rejected,
    /// No response was received
    Transport,
}

impl ApiResponse {
    pub fn transport_failure(error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            status: 0,
            data: json!({
                "message": NETWORK_ERROR_MESSAGE,
                "error": error.to_string(),
            }),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self.status {
            0 => Outcome::Transport,
            401 => Outcome::Unauthorized,
            _ if self.ok => Outcome::Success,
            _ => Outcome::Rejected,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.outcome() == Outcome::Unauthorized
    }

    /// The server-provided `message`, if the payload carries one.
    pub fn message(&self) -> Option<&str> {
        self.data
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
    }

    pub fn message_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.message().unwrap_or(default)
    }

    /// Payload on success, otherwise an `ApiError` carrying the server
    /// message or `default`.
    pub fn into_result(self, default: &str) -> Result<Value, ApiError> {
        if self.ok {
            Ok(self.data)
        } else {
            Err(ApiError::from_status(self.status, self.message_or(default)))
        }
    }
}

/// Receives every envelope produced by an `ApiClient`, before the caller does.
pub trait ResponseObserver: Send + Sync {
    fn on_response(&self, path: &str, response: &ApiResponse);
}
