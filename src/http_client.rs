//! The HTTP transport underlying every non-streaming and streaming REST
//! call.
//!
//! Wraps a single [`reqwest::Client`] with the retry policy described by
//! [`crate::config::Config::max_retries`] (exponential backoff via the
//! `backoff` crate) and funnels streaming responses through our own
//! [`crate::sse::SseTokenizer`] rather than an eventsource crate.

use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{map_api_error, map_status, GrokError, WrappedApiError};
use crate::sse::{parse_stream_chunk, SseEvent, SseTokenizer, StreamChunk};

/// Thin wrapper around [`reqwest::Client`] that applies this crate's retry
/// and error-mapping policy uniformly across resources.
#[derive(Clone, Debug)]
pub(crate) struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub(crate) fn new(timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("reqwest client builder should not fail with these settings");
        Self { client }
    }

    /// Builds a time-bounded exponential backoff policy. `backoff` has no
    /// native "stop after N attempts" knob, so `max_retries` is honored by
    /// the caller: `max_retries() == 0` skips retrying altogether, and any
    /// nonzero value uses this same policy, capped by elapsed time rather
    /// than attempt count.
    fn backoff_policy() -> backoff::ExponentialBackoff {
        backoff::ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(200))
            .with_multiplier(2.0)
            .with_max_elapsed_time(Some(Duration::from_secs(30)))
            .with_max_interval(Duration::from_secs(5))
            .build()
    }

    /// Sends a JSON request and deserializes the response body, retrying
    /// transport failures and 5xx/429 responses per `config.max_retries()`.
    /// `max_retries() == 0` disables retry entirely.
    pub(crate) async fn send_json<C, Req, Resp>(
        &self,
        config: &C,
        method: Method,
        path: &str,
        body: Option<&Req>,
    ) -> Result<Resp, GrokError>
    where
        C: Config,
        Req: serde::Serialize,
        Resp: DeserializeOwned,
    {
        let bytes = self
            .send_with_retry(config, method, path, body)
            .await?;
        serde_json::from_slice(&bytes).map_err(|e| GrokError::parse(e, String::from_utf8_lossy(&bytes).into_owned()))
    }

    async fn send_with_retry<C, Req>(
        &self,
        config: &C,
        method: Method,
        path: &str,
        body: Option<&Req>,
    ) -> Result<Bytes, GrokError>
    where
        C: Config,
        Req: serde::Serialize,
    {
        let url = config.url(path);
        let headers = config.headers();
        let payload = body.map(serde_json::to_vec).transpose().map_err(|e| GrokError::parse(e, String::new()))?;

        let operation = || async {
            let mut req = self.client.request(method.clone(), url.as_str()).headers(headers.clone());
            if let Some(payload) = &payload {
                req = req.body(payload.clone());
            }
            tracing::debug!(%method, %url, "sending request");

            let response = req.send().await.map_err(|e| {
                let err = GrokError::from_reqwest(e);
                classify_retry(err)
            })?;

            let status = response.status();
            let bytes = response.bytes().await.map_err(|e| classify_retry(GrokError::from_reqwest(e)))?;

            if status.is_success() {
                return Ok(bytes);
            }

            let mapped = map_response_error(status, &bytes);
            Err(classify_retry(mapped))
        };

        if config.max_retries() == 0 {
            return operation().await.map_err(unwrap_retry);
        }

        backoff::future::retry(Self::backoff_policy(), operation)
            .await
            .map_err(unwrap_retry)
    }

    /// Sends a streaming chat/response request and returns a [`Stream`] of
    /// parsed [`StreamChunk`]s, driven by feeding response bytes through an
    /// [`SseTokenizer`] as they arrive from the wire.
    pub(crate) fn post_stream<C, Req>(
        &self,
        config: &C,
        path: &str,
        body: &Req,
    ) -> impl Stream<Item = Result<StreamChunk, GrokError>> + Send + 'static
    where
        C: Config,
        Req: serde::Serialize,
    {
        let url = config.url(path);
        let headers = config.headers();
        let payload = serde_json::to_vec(body);
        let client = self.client.clone();

        async_stream::stream! {
            let payload = match payload {
                Ok(p) => p,
                Err(e) => {
                    yield Err(GrokError::parse(e, String::new()));
                    return;
                }
            };

            let response = match client.post(url.as_str()).headers(headers).body(payload).send().await {
                Ok(r) => r,
                Err(e) => {
                    yield Err(GrokError::from_reqwest(e));
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let bytes = response.bytes().await.unwrap_or_default();
                yield Err(map_response_error(status, &bytes));
                return;
            }

            let mut tokenizer = SseTokenizer::new();
            let mut byte_stream = response.bytes_stream();
            while let Some(chunk) = byte_stream.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(GrokError::from_reqwest(e));
                        return;
                    }
                };
                tokenizer.feed(&chunk);
                while let Some(event) = tokenizer.next_event() {
                    match event {
                        SseEvent::Done => return,
                        SseEvent::Data(data) => {
                            match parse_stream_chunk(&data) {
                                Ok(parsed) => yield Ok(parsed),
                                Err(e) => yield Err(GrokError::parse(e, data)),
                            }
                        }
                    }
                }
            }
        }
    }
}

fn map_response_error(status: StatusCode, body: &[u8]) -> GrokError {
    match serde_json::from_slice::<WrappedApiError>(body) {
        Ok(wrapped) => map_api_error(wrapped.error),
        Err(_) => map_status(status, String::from_utf8_lossy(body).into_owned()),
    }
}

/// `backoff` distinguishes permanent vs. transient failures; this crate
/// retries 5xx, 429, and raw transport errors, and treats everything else
/// (4xx other than 429, parse failures) as permanent.
fn classify_retry(err: GrokError) -> backoff::Error<GrokError> {
    match &err {
        GrokError::RateLimit => backoff::Error::transient(err),
        GrokError::Http(_) | GrokError::Timeout => backoff::Error::transient(err),
        GrokError::ApiError(api) if api.code.as_deref().is_some_and(is_retryable_status_code) => {
            backoff::Error::transient(err)
        }
        _ => backoff::Error::permanent(err),
    }
}

fn is_retryable_status_code(code: &str) -> bool {
    code.parse::<u16>().map(|c| (500..600).contains(&c)).unwrap_or(false)
}

fn unwrap_retry(err: backoff::Error<GrokError>) -> GrokError {
    match err {
        backoff::Error::Permanent(e) => e,
        backoff::Error::Transient { err, .. } => err,
    }
}
