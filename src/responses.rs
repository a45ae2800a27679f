//! The agentic Responses API: `POST /responses`, server-side tool execution.
//!
//! Reuses the chat request builder and response parser wholesale, but
//! defaults the model to `grok-4` and requires at least one tool — xAI only
//! supports this endpoint on the grok-4 family.

use crate::client::Client;
use crate::config::Config;
use crate::error::GrokError;
use crate::tools::ToolDefinition;
use crate::types::{ChatResponse, CreateChatRequest, Message};

const DEFAULT_RESPONSES_MODEL: &str = "grok-4";

/// Models the Responses API is documented to work with.
pub const RESPONSES_SUPPORTED_MODELS: &[&str] = &["grok-4", "grok-4-fast-reasoning", "grok-4-fast-non-reasoning"];

/// Agentic completions with server-orchestrated tool execution.
pub struct Responses<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Responses<'c, C> {
    pub fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Runs an agentic completion. At least one tool is required; xAI
    /// executes the tool calls itself rather than handing them back for the
    /// caller to run.
    pub async fn create(&self, messages: Vec<Message>, tools: Vec<ToolDefinition>) -> Result<ChatResponse, GrokError> {
        if tools.is_empty() {
            return Err(GrokError::InvalidArgument("responses completion requires at least one tool".into()));
        }
        if messages.is_empty() {
            return Err(GrokError::InvalidArgument("messages must not be empty".into()));
        }
        let request = CreateChatRequest {
            model: Some(DEFAULT_RESPONSES_MODEL.to_string()),
            messages,
            tools: Some(tools),
            ..Default::default()
        };
        let response: ChatResponse = self.client.post("/responses", &request).await?;
        if response.choices.is_empty() {
            return Err(crate::error::empty_choices(&response.model));
        }
        Ok(response)
    }
}
