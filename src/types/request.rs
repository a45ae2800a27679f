//! Chat/responses request body and the search-grounding parameter tree.
//!
//! Parameters the xAI API is documented to accept but silently ignore
//! (`stop`, `presence_penalty`, `frequency_penalty`, `user_id`) are not
//! modeled at all rather than modeled-and-dropped.

use derive_builder::Builder;
use serde::Serialize;

use crate::tools::{ToolChoice, ToolDefinition};
use crate::types::message::Message;

/// Search mode for grounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Off,
    Auto,
    On,
}

/// One search source configuration, as a tagged union over source kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchSource {
    Web {
        #[serde(skip_serializing_if = "Option::is_none")]
        allowed_websites: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        excluded_websites: Option<Vec<String>>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        safe_search: bool,
    },
    News {
        #[serde(skip_serializing_if = "Option::is_none")]
        country: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        excluded_websites: Option<Vec<String>>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        safe_search: bool,
    },
    X {
        #[serde(skip_serializing_if = "Option::is_none")]
        included_x_handles: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        excluded_x_handles: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        post_favorite_count_min: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        post_view_count_min: Option<u32>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        enable_image_understanding: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        enable_video_understanding: bool,
    },
    Rss {
        rss_links: Vec<String>,
    },
}

/// Search/grounding parameters.
#[derive(Debug, Clone, Serialize)]
pub struct SearchParams {
    pub mode: SearchMode,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub return_citations: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SearchSource>>,
}

impl SearchParams {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            return_citations: false,
            from_date: None,
            to_date: None,
            max_results: None,
            sources: None,
        }
    }

    pub fn with_citations(mut self) -> Self {
        self.return_citations = true;
        self
    }

    pub fn with_sources(mut self, sources: Vec<SearchSource>) -> Self {
        self.sources = Some(sources);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StreamOptions {
    pub include_usage: bool,
}

/// The `search` object is only meaningful when grounding is actually
/// requested; `mode: "off"` is the server's default, so omit the object
/// entirely rather than send it redundantly.
fn should_skip_search(search_params: &Option<SearchParams>) -> bool {
    match search_params {
        None => true,
        Some(params) => params.mode == SearchMode::Off,
    }
}

/// Body for `POST /chat/completions` (and, with `tools` populated and the
/// client routed to `/responses`, the agentic Responses endpoint — the two
/// share one wire shape).
///
/// Fields absent from a request (temperature/top_p unset, max_tokens unset)
/// are simply omitted via `skip_serializing_if` rather than sent at a
/// sentinel value.
#[derive(Debug, Clone, Serialize, Builder)]
#[builder(name = "CreateChatRequestBuilder")]
#[builder(pattern = "owned")]
#[builder(setter(into, strip_option), default)]
pub struct CreateChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", rename = "parallel_tool_calls")]
    pub parallel_function_calling: bool,
    #[serde(skip_serializing_if = "should_skip_search", rename = "search")]
    pub search_params: Option<SearchParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) stream_options: Option<StreamOptions>,
}

impl Default for CreateChatRequest {
    fn default() -> Self {
        Self {
            model: None,
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            reasoning_effort: None,
            parallel_function_calling: false,
            search_params: None,
            tools: None,
            tool_choice: None,
            stream: false,
            stream_options: None,
        }
    }
}

impl CreateChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages, ..Default::default() }
    }

    pub fn builder() -> CreateChatRequestBuilder {
        CreateChatRequestBuilder::default()
    }

    /// Marks the request as streaming and attaches the `stream_options`
    /// block xAI requires alongside `stream: true`.
    pub(crate) fn into_streaming(mut self) -> Self {
        self.stream = true;
        self.stream_options = Some(StreamOptions { include_usage: true });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_omits_unset_optional_fields() {
        let req = CreateChatRequest::new(vec![Message::user("hi")]);
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
        assert!(json.get("stream").is_none());
    }

    #[test]
    fn streaming_request_includes_stream_options() {
        let req = CreateChatRequest::new(vec![Message::user("hi")]).into_streaming();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], true);
        assert_eq!(json["stream_options"]["include_usage"], true);
    }

    #[test]
    fn search_params_only_serialize_mode_on_by_default() {
        let sp = SearchParams::new(SearchMode::Auto);
        let json = serde_json::to_value(&sp).unwrap();
        assert_eq!(json["mode"], "auto");
        assert!(json.get("return_citations").is_none());
    }

    #[test]
    fn search_object_omitted_when_mode_is_off() {
        let req = CreateChatRequest::builder()
            .messages(vec![Message::user("hi")])
            .search_params(SearchParams::new(SearchMode::Off))
            .build()
            .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("search").is_none());
    }

    #[test]
    fn search_object_present_when_mode_is_on() {
        let req = CreateChatRequest::builder()
            .messages(vec![Message::user("hi")])
            .search_params(SearchParams::new(SearchMode::On))
            .build()
            .unwrap();
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["search"]["mode"], "on");
    }
}
