//! The top-level client: wires [`crate::config::Config`] to the
//! [`crate::http_client::HttpTransport`] and exposes one accessor per
//! resource (`Chat`, `Models`, `Images`, `Tokenize`, `Responses`).

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::chat::Chat;
use crate::config::{Config, GrokConfig};
use crate::error::GrokError;
use crate::http_client::HttpTransport;
use crate::image::Images;
use crate::model::Models;
use crate::responses::Responses;
use crate::sse::StreamChunk;
use crate::tokenize::Tokenize;

/// Entry point for every Grok HTTP resource. Cheap to clone: the inner
/// [`reqwest::Client`] is itself a handle around a shared connection pool.
#[derive(Clone, Debug)]
pub struct Client<C: Config = GrokConfig> {
    http: HttpTransport,
    config: C,
}

impl Client<GrokConfig> {
    /// Builds a client from [`GrokConfig::new`] (API key from
    /// `GROK_API_KEY`, every other setting at its default).
    pub fn new() -> Self {
        Self::with_config(GrokConfig::new())
    }
}

impl Default for Client<GrokConfig> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Config> Client<C> {
    pub fn with_config(config: C) -> Self {
        let http = HttpTransport::new(config.timeout_ms());
        Self { http, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn chat(&self) -> Chat<'_, C> {
        Chat::new(self)
    }

    pub fn responses(&self) -> Responses<'_, C> {
        Responses::new(self)
    }

    pub fn images(&self) -> Images<'_, C> {
        Images::new(self)
    }

    pub fn tokenize(&self) -> Tokenize<'_, C> {
        Tokenize::new(self)
    }

    pub fn models(&self) -> Models<'_, C> {
        Models::new(self)
    }

    pub(crate) async fn get<Resp>(&self, path: &str) -> Result<Resp, GrokError>
    where
        Resp: DeserializeOwned,
    {
        self.http.send_json::<C, (), Resp>(&self.config, Method::GET, path, None).await
    }

    pub(crate) async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, GrokError>
    where
        Req: serde::Serialize,
        Resp: DeserializeOwned,
    {
        self.http.send_json(&self.config, Method::POST, path, Some(body)).await
    }

    pub(crate) fn post_stream<Req>(
        &self,
        path: &str,
        body: &Req,
    ) -> impl futures::Stream<Item = Result<StreamChunk, GrokError>> + Send + 'static
    where
        Req: serde::Serialize,
    {
        self.http.post_stream(&self.config, path, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_client_builds_without_panicking() {
        let _client = Client::<GrokConfig>::new();
    }
}
