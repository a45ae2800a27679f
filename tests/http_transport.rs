//! Integration tests for the HTTP transport against a mocked server,
//! following the pack's wiremock convention for LLM-provider crates
//! (see e.g. `neuron-provider-ollama`'s integration tests).

use futures::StreamExt;
use grok_rt::types::{CreateChatRequest, Message};
use grok_rt::{Client, GrokConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client<GrokConfig> {
    Client::with_config(
        GrokConfig::default()
            .with_api_key("test-key")
            .with_api_base(server.uri())
            .with_max_retries(0),
    )
}

fn hello_request() -> CreateChatRequest {
    CreateChatRequest::new(vec![Message::user("Say hi.")])
}

#[tokio::test]
async fn simple_text_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "grok-3-latest",
            "choices": [{"message": {"role": "assistant", "content": "Hi!"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 2, "total_tokens": 5},
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client.chat().create(hello_request()).await.expect("should succeed");

    assert_eq!(response.content(), Some("Hi!"));
    assert_eq!(response.choices[0].finish_reason, grok_rt::types::FinishReason::Stop);
    assert_eq!(response.usage.total_tokens, 5);
}

#[tokio::test]
async fn streaming_chat_happy_path() {
    let server = MockServer::start().await;
    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sse_body))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut stream = client.chat().create_stream(hello_request());

    let first = stream.next().await.expect("first chunk").expect("ok");
    assert_eq!(first.content_delta.as_deref(), Some("Hel"));
    let second = stream.next().await.expect("second chunk").expect("ok");
    assert_eq!(second.content_delta.as_deref(), Some("lo"));
    assert!(stream.next().await.is_none(), "stream ends at [DONE]");
}

#[tokio::test]
async fn auth_failure_maps_to_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"message": "invalid api key", "type": "authentication_error"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.chat().create(hello_request()).await.unwrap_err();

    assert!(matches!(err, grok_rt::GrokError::AuthFailed));
}

#[tokio::test]
async fn empty_choices_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "grok-3-latest",
            "choices": [],
            "usage": {"prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1},
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.chat().create(hello_request()).await.unwrap_err();

    assert!(matches!(err, grok_rt::GrokError::ParseFailed(_, _)));
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limit_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.chat().create(hello_request()).await.unwrap_err();

    assert!(matches!(err, grok_rt::GrokError::RateLimit));
}
