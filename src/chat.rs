//! Chat completions: `POST /chat/completions`, synchronous and streaming.
//!
//! Fills in the client's default model/max-tokens/temperature where the
//! caller left them unset, dispatches the request, and either parses one
//! JSON reply or drives an SSE stream of content deltas.

use futures::Stream;

use crate::client::Client;
use crate::config::Config;
use crate::error::GrokError;
use crate::sse::StreamChunk;
use crate::types::{ChatResponse, CreateChatRequest};

/// Given a list of messages, returns one or more model-generated replies.
pub struct Chat<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Chat<'c, C> {
    pub fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Creates a chat completion. `request.model` defaults to
    /// [`Config::default_model`] when unset.
    pub async fn create(&self, mut request: CreateChatRequest) -> Result<ChatResponse, GrokError> {
        if request.stream {
            return Err(GrokError::InvalidArgument(
                "when stream is true, use Chat::create_stream".into(),
            ));
        }
        if request.messages.is_empty() {
            return Err(GrokError::InvalidArgument("messages must not be empty".into()));
        }
        self.fill_defaults(&mut request);
        let response: ChatResponse = self.client.post("/chat/completions", &request).await?;
        if response.choices.is_empty() {
            return Err(crate::error::empty_choices(&response.model));
        }
        Ok(response)
    }

    /// Creates a streaming chat completion. Returns a [`Stream`] of
    /// incremental [`StreamChunk`]s terminated by the server's `[DONE]`
    /// marker rather than a single final response.
    pub fn create_stream(
        &self,
        mut request: CreateChatRequest,
    ) -> impl Stream<Item = Result<StreamChunk, GrokError>> + Send + 'static {
        use futures::StreamExt;

        if request.messages.is_empty() {
            let err = GrokError::InvalidArgument("messages must not be empty".into());
            return futures::stream::once(async move { Err(err) }).boxed();
        }
        self.fill_defaults(&mut request);
        self.client.post_stream("/chat/completions", &request.into_streaming()).boxed()
    }

    fn fill_defaults(&self, request: &mut CreateChatRequest) {
        if request.model.is_none() {
            request.model = Some(self.client.config().default_model().to_string());
        }
        if request.max_tokens.is_none() {
            request.max_tokens = Some(self.client.config().default_max_tokens());
        }
        if request.temperature.is_none() {
            request.temperature = Some(self.client.config().default_temperature());
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use crate::config::GrokConfig;
    use crate::types::CreateChatRequest;

    use super::*;

    #[tokio::test]
    async fn create_rejects_empty_messages() {
        let client = Client::<GrokConfig>::with_config(GrokConfig::default().with_api_key("test"));
        let err = client.chat().create(CreateChatRequest::default()).await.unwrap_err();
        assert!(matches!(err, GrokError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn create_stream_rejects_empty_messages() {
        let client = Client::<GrokConfig>::with_config(GrokConfig::default().with_api_key("test"));
        let mut stream = client.chat().create_stream(CreateChatRequest::default());
        let first = stream.next().await.expect("stream yields one item");
        assert!(matches!(first, Err(GrokError::InvalidArgument(_))));
    }
}
