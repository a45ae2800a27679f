//! Token counting: `POST /tokenize-text`, plus the message-level
//! approximation and memory-sizing helper.
//!
//! The messages variant is an approximation: it concatenates message
//! contents with newline separators and counts tokens on the combined
//! text, so it doesn't account for per-message structural overhead.

use crate::client::Client;
use crate::config::Config;
use crate::error::GrokError;
use crate::types::message::Content;
use crate::types::{Message, TokenizeRequest, TokenizeResponse};

pub struct Tokenize<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Tokenize<'c, C> {
    pub fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Counts tokens in a single block of text.
    pub async fn count(&self, text: impl Into<String>, model: Option<&str>) -> Result<u32, GrokError> {
        let model = model.unwrap_or_else(|| self.client.config().default_model()).to_string();
        let request = TokenizeRequest { text: text.into(), model };
        let response: TokenizeResponse = self.client.post("/tokenize-text", &request).await?;
        Ok(response.token_count)
    }

    /// Approximates the token count of a full conversation by concatenating
    /// every message's text content with newlines and tokenizing the
    /// result. Non-text (multi-modal) content is skipped.
    pub async fn count_messages(&self, messages: &[Message], model: Option<&str>) -> Result<u32, GrokError> {
        let combined = messages
            .iter()
            .filter_map(|m| match &m.content {
                Some(Content::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");
        self.count(combined, model).await
    }
}
