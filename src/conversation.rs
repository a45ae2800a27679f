//! A convenience wrapper accumulating message history across calls to a
//! [`crate::chat::Chat`] client.
//!
//! Not a new wire concept: just a `Vec<Message>` plus an optional system
//! prompt and a helper that appends the assistant's reply after each
//! round-trip.

use crate::chat::Chat;
use crate::config::Config;
use crate::error::GrokError;
use crate::types::{CreateChatRequest, Message};

/// An ordered message history, optionally seeded with a system prompt, that
/// grows by one user/assistant pair per [`Conversation::send`] call.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Starts an empty conversation.
    pub fn new() -> Self {
        Self { messages: Vec::new() }
    }

    /// Starts a conversation seeded with a system prompt.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self { messages: vec![Message::system(prompt)] }
    }

    /// The accumulated history, in order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Appends a message without making a request (e.g. to seed history
    /// from a prior session, or to record a tool result).
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a user turn, sends the full accumulated history to `chat`,
    /// appends the assistant's reply, and returns it.
    ///
    /// Request options other than `messages` come from `request` (model,
    /// temperature, tools, etc. — whatever the caller has already set);
    /// `request.messages` is overwritten with this conversation's history.
    pub async fn send<C: Config>(
        &mut self,
        chat: &Chat<'_, C>,
        user_message: impl Into<String>,
        mut request: CreateChatRequest,
    ) -> Result<&Message, GrokError> {
        self.messages.push(Message::user(user_message));
        request.messages = self.messages.clone();
        let response = chat.create(request).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .expect("Chat::create already rejects an empty choices array");
        self.messages.push(Message {
            role: crate::types::Role::Assistant,
            content: choice.message.content.map(crate::types::Content::Text),
            name: None,
            tool_call_id: None,
            tool_calls: choice.message.tool_calls,
        });
        Ok(self.messages.last().expect("just pushed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_system_prompt_seeds_one_message() {
        let convo = Conversation::with_system_prompt("be terse");
        assert_eq!(convo.messages().len(), 1);
        assert_eq!(convo.messages()[0].role, crate::types::Role::System);
    }

    #[test]
    fn push_appends_without_network_access() {
        let mut convo = Conversation::new();
        convo.push(Message::user("hi"));
        assert_eq!(convo.messages().len(), 1);
    }
}
