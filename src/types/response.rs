//! Chat/responses reply bodies: choices, usage accounting, and citations.
//!
//! The server accepts citations either as a bare URL string or as a full
//! object; both shapes are preserved here via an untagged enum rather than
//! normalizing one away.

use serde::{Deserialize, Serialize};

use crate::types::message::ToolCallRequest;

/// Why the model stopped generating, matching the literal strings xAI
/// sends in `finish_reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    /// Any value outside the known set, kept rather than rejected so an
    /// unrecognized reason doesn't fail parsing the whole response.
    #[serde(other)]
    Other,
}

/// Token accounting returned alongside a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A search citation. xAI sends either a bare source URL or a full object
/// with source metadata; `#[serde(untagged)]` accepts both rather than
/// forcing one shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Citation {
    Url(String),
    Detailed(CitationDetail),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationDetail {
    pub source_type: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

impl Citation {
    /// The citation's URL regardless of which shape it arrived in.
    pub fn url(&self) -> &str {
        match self {
            Citation::Url(url) => url,
            Citation::Detailed(detail) => &detail.url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning_content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Body of a (non-streaming) `POST /chat/completions` response. The error
/// envelope (`{"error": {...}}`) is checked first by
/// [`crate::http_client::HttpTransport`] and surfaces as a [`crate::error::GrokError`]
/// before a `ChatResponse` is ever constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default)]
    pub citations: Option<Vec<Citation>>,
}

impl ChatResponse {
    /// The first choice's message content, if any was returned.
    pub fn content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn citation_accepts_bare_url_string() {
        let citations: Vec<Citation> = serde_json::from_str(r#"["https://example.test/a"]"#).unwrap();
        assert_eq!(citations[0].url(), "https://example.test/a");
    }

    #[test]
    fn citation_accepts_detailed_object() {
        let json = r#"[{"source_type":"web","url":"https://example.test/a","title":"A"}]"#;
        let citations: Vec<Citation> = serde_json::from_str(json).unwrap();
        match &citations[0] {
            Citation::Detailed(d) => assert_eq!(d.title.as_deref(), Some("A")),
            Citation::Url(_) => panic!("expected detailed citation"),
        }
    }

    #[test]
    fn chat_response_parses_minimal_shape() {
        let json = r#"{
            "model": "grok-4",
            "choices": [{"message": {"content": "hi"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.content(), Some("hi"));
        assert_eq!(resp.choices[0].finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn missing_finish_reason_defaults_to_none() {
        let json = r#"{
            "model": "grok-4",
            "choices": [{"message": {"content": "hi"}}]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices[0].finish_reason, None);
    }

    #[test]
    fn unknown_finish_reason_parses_as_other() {
        let json = r#"{
            "model": "grok-4",
            "choices": [{"message": {"content": "hi"}, "finish_reason": "something_new"}]
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.choices[0].finish_reason, Some(FinishReason::Other));
    }
}
