//! Chat message types: roles, content parts, images, and tool-call shapes.

use serde::{Deserialize, Serialize};

/// A message role, serialized exactly as the wire expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Detail level requested for an image part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    Auto,
    Low,
    High,
}

/// A reference to an image attached to a user message, always sent as a
/// remote `url` (including `data:` URIs for locally supplied bytes) since
/// the wire format has no separate inline-bytes shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

impl ImageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), detail: None }
    }

    /// Builds an image part from raw bytes, base64-encoding them into a
    /// `data:` URI since the wire format has no separate inline-bytes shape.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::new(format!("data:{mime_type};base64,{encoded}"))
    }

    pub fn with_detail(mut self, detail: ImageDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// One element of a multi-modal message's `content` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageRef },
}

/// A message's content: either plain text, or a multi-modal array of parts.
/// Serializes to a bare JSON string in the simple case, which is all the
/// wire format needs when no images are attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Content::Text(s.to_string())
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Content::Text(s)
    }
}

/// A single function/tool call emitted by the assistant. Arguments are kept
/// as a raw JSON string: this crate never parses or dispatches them,
/// leaving execution to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ToolCallFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    pub arguments: String,
}

/// A chat message, covering every role and the vision/tool-call extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "tool_call_id")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "tool_calls")]
    pub tool_calls: Option<Vec<ToolCallRequest>>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, Some(Content::Text(content.into())))
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, Some(Content::Text(content.into())))
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, Some(Content::Text(content.into())))
    }

    /// A user message with text plus one or more images, matching the
    /// request builder's multi-modal content-array branch.
    pub fn user_with_images(text: impl Into<String>, images: Vec<ImageRef>) -> Self {
        let mut parts = vec![ContentPart::Text { text: text.into() }];
        parts.extend(images.into_iter().map(|image_url| ContentPart::ImageUrl { image_url }));
        Self::new(Role::User, Some(Content::Parts(parts)))
    }

    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(Content::Text(content.into())),
            name: None,
            tool_call_id: Some(tool_call_id.into()),
            tool_calls: None,
        }
    }

    fn new(role: Role, content: Option<Content>) -> Self {
        Self { role, content, name: None, tool_call_id: None, tool_calls: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_text_message_serializes_content_as_bare_string() {
        let msg = Message::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["content"], "hi");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn vision_message_serializes_content_array() {
        let msg = Message::user_with_images("describe this", vec![ImageRef::new("https://example.test/a.png")]);
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json["content"].is_array());
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][1]["type"], "image_url");
    }

    #[test]
    fn image_ref_from_bytes_builds_data_uri() {
        let img = ImageRef::from_bytes(b"\x89PNG", "image/png");
        assert!(img.url.starts_with("data:image/png;base64,"));
    }
}
