//! Model listing and capability lookup.
//!
//! `list` still calls `GET /models` to confirm connectivity and
//! credentials, but returns the local capability table verbatim rather than
//! inventing a response schema the live endpoint hasn't published.

use crate::client::Client;
use crate::config::Config;
use crate::error::GrokError;
use crate::types::model::{self, ModelInfo};

pub struct Models<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Models<'c, C> {
    pub fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Lists known models. Touches the network (`GET /models`) to confirm
    /// connectivity and credentials, then returns the local capability
    /// table rather than whatever shape the live endpoint happens to send.
    pub async fn list(&self) -> Result<&'static [ModelInfo], GrokError> {
        let _: serde_json::Value = self.client.get("/models").await?;
        Ok(model::MODEL_DATABASE)
    }

    /// Looks up a model's capabilities without making a network call.
    pub fn info(&self, model_id: &str) -> Option<&'static ModelInfo> {
        model::lookup(model_id)
    }
}
