//! Tokenize-endpoint request/response shapes and the message-token estimate
//! used by [`crate::tokenize::Tokenize`].
//!
//! `POST /tokenize-text` takes `{"text", "model"}` and replies with
//! `{"token_count"}`. `estimate_memory` applies a `token_count * 4 + 1024`
//! heuristic for callers that need to size a reply buffer up front rather
//! than grow one dynamically.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct TokenizeRequest {
    pub text: String,
    pub model: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TokenizeResponse {
    pub token_count: u32,
}

/// Rough byte-size estimate for buffering a reply of `token_count` tokens.
pub fn estimate_memory(token_count: u32) -> usize {
    token_count as usize * 4 + 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_estimate_uses_per_token_heuristic() {
        assert_eq!(estimate_memory(0), 1024);
        assert_eq!(estimate_memory(100), 1424);
    }
}
