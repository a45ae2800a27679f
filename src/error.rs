//! Error taxonomy returned by every fallible operation in this crate.
//!
//! A single `thiserror`-derived enum so callers can match on error *kind*
//! rather than parse a string.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum GrokError {
    /// Underlying error from the HTTP client after a request was made.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server's request timed out.
    #[error("request timed out")]
    Timeout,

    /// The server returned HTTP 401.
    #[error("authentication failed")]
    AuthFailed,

    /// The server returned HTTP 429.
    #[error("rate limit exceeded")]
    RateLimit,

    /// The server returned a structured error envelope, or a non-2xx status
    /// that doesn't map to a more specific variant.
    #[error("{0}")]
    ApiError(ApiError),

    /// A response body could not be deserialized into the expected shape.
    #[error("failed to parse response: {0} (body: {1})")]
    ParseFailed(serde_json::Error, String),

    /// Client-side request validation failed before anything was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested feature isn't implemented by this revision of the core.
    #[error("not supported: {0}")]
    NotSupported(String),

    /// A voice-session operation was attempted before `SessionReady`.
    #[error("voice session is not ready")]
    NotReady,

    /// A second turn was requested while one was already in flight.
    #[error("voice session is busy with another turn")]
    Busy,

    /// The realtime WebSocket transport failed.
    #[error("websocket error: {0}")]
    WsFailed(#[from] tokio_tungstenite::tungstenite::Error),

    /// A fixed-capacity region could not satisfy a request and no heap
    /// fallback was available (e.g. a caller-supplied fixed buffer that
    /// genuinely cannot grow).
    #[error("out of memory")]
    OutOfMemory,
}

impl GrokError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GrokError::Timeout
        } else {
            GrokError::Http(err)
        }
    }

    pub(crate) fn parse(err: serde_json::Error, body: impl Into<String>) -> Self {
        let body = body.into();
        tracing::error!(error = %err, body = %body, "failed to deserialize response");
        GrokError::ParseFailed(err, body)
    }
}

/// The server's JSON error envelope: `{"error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    pub r#type: Option<String>,
    pub param: Option<String>,
    pub code: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(t) = &self.r#type {
            parts.push(format!("{t}:"));
        }
        parts.push(self.message.clone());
        if let Some(param) = &self.param {
            parts.push(format!("(param: {param})"));
        }
        if let Some(code) = &self.code {
            parts.push(format!("(code: {code})"));
        }
        write!(f, "{}", parts.join(" "))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WrappedApiError {
    pub error: ApiError,
}

/// Maps the server's `error.type` string to a [`GrokError`] kind, per the
/// JSON codec's error-envelope contract.
pub(crate) fn map_api_error(api_err: ApiError) -> GrokError {
    match api_err.r#type.as_deref() {
        Some("invalid_request_error") => GrokError::InvalidArgument(api_err.message),
        Some("authentication_error") => GrokError::AuthFailed,
        Some("rate_limit_error") => GrokError::RateLimit,
        _ => GrokError::ApiError(api_err),
    }
}

/// A successful envelope with an empty `choices` array is treated as a
/// malformed reply rather than a valid zero-choice response.
pub(crate) fn empty_choices(model: &str) -> GrokError {
    use serde::de::Error as _;
    GrokError::ParseFailed(
        serde_json::Error::custom("choices array is empty"),
        format!("model={model}, choices=[]"),
    )
}

/// Maps an HTTP status code to a [`GrokError`] kind for non-2xx responses
/// that did not carry a parseable error envelope.
pub(crate) fn map_status(status: reqwest::StatusCode, body: String) -> GrokError {
    match status.as_u16() {
        401 => GrokError::AuthFailed,
        429 => GrokError::RateLimit,
        _ => GrokError::ApiError(ApiError {
            message: body,
            r#type: None,
            param: None,
            code: Some(status.as_str().to_string()),
        }),
    }
}
