//! Response envelope of the back-office API.
//!
//! The API answers every call with `{ "success": bool, "data": ..., "error": "..." }`.
//! The envelope is interpreted exactly once, at the client boundary, into
//! [`ApiResponse`]; nothing past that point branches on the raw shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Raw wire envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiEnvelope {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    /// Interpret the envelope, decoding `data` into `T`.
    ///
    /// A successful envelope without `data` decodes from `null`, so unit-like
    /// targets (`()`, `Option<_>`, `Value`) accept it.
    pub fn into_response<T: DeserializeOwned>(self) -> ApiResponse<T> {
        if !self.success {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "Request was rejected".to_string());
            return Err(ApiFailure::new(FailureKind::Rejected, message));
        }
        let data = self.data.unwrap_or(Value::Null);
        serde_json::from_value(data)
            .map_err(|e| ApiFailure::new(FailureKind::Decode, format!("Unexpected response: {}", e)))
    }
}

/// Typed outcome of an API call.
pub type ApiResponse<T> = Result<T, ApiFailure>;

/// Class of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Request never completed (offline, CORS, DNS).
    Network,
    /// 401 / 403.
    Unauthorized,
    /// 404, including endpoints the backend does not implement yet.
    NotFound,
    /// Backend refused the payload (`success: false` or another 4xx).
    Rejected,
    /// 5xx.
    Server,
    /// Request or response body did not match the expected shape.
    Decode,
}

impl FailureKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            500..=599 => Self::Server,
            _ => Self::Rejected,
        }
    }

    /// Whether resending the same request may succeed without user changes.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
            Self::Server => "server",
            Self::Decode => "decode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    /// Request body could not be serialized. Not retryable: the same payload
    /// fails the same way.
    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Decode, format!("Could not encode request: {}", message.into()))
    }

    /// Build a failure from a non-2xx HTTP status and the response body.
    ///
    /// The body is usually an envelope; its `error` text wins over the bare status.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ApiEnvelope>(body)
            .ok()
            .and_then(|env| env.error)
            .filter(|e| !e.trim().is_empty());
        let message = match detail {
            Some(text) => format!("{}: {}", status, text),
            None => format!("Request failed with status {}", status),
        };
        Self::new(FailureKind::from_status(status), message)
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_decodes_data() {
        let env: ApiEnvelope =
            serde_json::from_value(json!({"success": true, "data": {"id": "oi-1"}})).unwrap();
        let data: Value = env.into_response().unwrap();
        assert_eq!(data["id"], "oi-1");
    }

    #[test]
    fn test_success_without_data_is_null() {
        let env: ApiEnvelope = serde_json::from_value(json!({"success": true})).unwrap();
        let data: Option<String> = env.into_response().unwrap();
        assert_eq!(data, None);
    }

    #[test]
    fn test_failure_keeps_backend_text() {
        let env = ApiEnvelope::err("404 not found");
        let failure = env.into_response::<Value>().unwrap_err();
        assert_eq!(failure.kind, FailureKind::Rejected);
        assert!(failure.to_string().contains("404 not found"));
    }

    #[test]
    fn test_failure_without_text_gets_default_message() {
        let env: ApiEnvelope = serde_json::from_value(json!({"success": false, "error": " "})).unwrap();
        let failure = env.into_response::<Value>().unwrap_err();
        assert_eq!(failure.message, "Request was rejected");
    }

    #[test]
    fn test_shape_mismatch_is_decode_failure() {
        let env = ApiEnvelope::ok(json!("not a list"));
        let failure = env.into_response::<Vec<String>>().unwrap_err();
        assert_eq!(failure.kind, FailureKind::Decode);
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(FailureKind::from_status(401), FailureKind::Unauthorized);
        assert_eq!(FailureKind::from_status(403), FailureKind::Unauthorized);
        assert_eq!(FailureKind::from_status(404), FailureKind::NotFound);
        assert_eq!(FailureKind::from_status(422), FailureKind::Rejected);
        assert_eq!(FailureKind::from_status(503), FailureKind::Server);
        assert!(FailureKind::Server.is_retryable());
        assert!(FailureKind::Network.is_retryable());
        assert!(!FailureKind::NotFound.is_retryable());
    }

    #[test]
    fn test_encode_failure_is_not_retryable() {
        let f = ApiFailure::encode("key must be a string");
        assert_eq!(f.kind, FailureKind::Decode);
        assert!(!f.is_retryable());
        assert_eq!(f.message, "Could not encode request: key must be a string");
    }

    #[test]
    fn test_from_status_prefers_envelope_error() {
        let f = ApiFailure::from_status(404, r#"{"success":false,"error":"shaft not found"}"#);
        assert_eq!(f.kind, FailureKind::NotFound);
        assert_eq!(f.message, "404: shaft not found");

        let f = ApiFailure::from_status(502, "<html>bad gateway</html>");
        assert_eq!(f.message, "Request failed with status 502");
    }
}
