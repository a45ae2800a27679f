//! Image generation request/response shapes.
//!
//! `size`, `quality`, `style`, and `user` are deliberately not modeled:
//! the image-generation endpoint never serializes them, so there's no
//! value in carrying fields that would always be ignored.

use serde::{Deserialize, Serialize};

fn default_image_model() -> String {
    "grok-2-image-latest".to_string()
}

fn default_response_format() -> String {
    "url".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    #[serde(default = "default_image_model")]
    pub model: String,
    pub prompt: String,
    pub n: u8,
    pub response_format: String,
}

impl ImageGenerationRequest {
    /// `n` is clamped to xAI's accepted range of 1-10.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: default_image_model(),
            prompt: prompt.into(),
            n: 1,
            response_format: default_response_format(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_n(mut self, n: u8) -> Self {
        self.n = n.clamp(1, 10);
        self
    }

    pub fn with_response_format(mut self, format: impl Into<String>) -> Self {
        self.response_format = format.into();
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenerationResponse {
    pub created: u64,
    pub data: Vec<ImageData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_is_clamped_to_one_through_ten() {
        let req = ImageGenerationRequest::new("a cat").with_n(50);
        assert_eq!(req.n, 10);
        let req = ImageGenerationRequest::new("a cat").with_n(0);
        assert_eq!(req.n, 1);
    }

    #[test]
    fn size_quality_style_user_have_no_wire_representation() {
        let req = ImageGenerationRequest::new("a cat");
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("size").is_none());
        assert!(json.get("quality").is_none());
        assert!(json.get("style").is_none());
        assert!(json.get("user").is_none());
    }
}
