//! Image generation: `POST /images/generations`.
//!
//! An empty `data` array in the reply is treated as a failure rather than a
//! successful zero-image response.

use crate::client::Client;
use crate::config::Config;
use crate::error::GrokError;
use crate::types::{ImageGenerationRequest, ImageGenerationResponse};

pub struct Images<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Images<'c, C> {
    pub fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Generates one or more images from a prompt.
    pub async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse, GrokError> {
        let response: ImageGenerationResponse = self.client.post("/images/generations", &request).await?;
        if response.data.is_empty() {
            return Err(GrokError::ApiError(crate::error::ApiError {
                message: "image generation returned an empty data array".to_string(),
                r#type: None,
                param: None,
                code: None,
            }));
        }
        Ok(response)
    }
}
