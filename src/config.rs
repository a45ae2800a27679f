//! Client configuration: immutable-after-construction settings for [`crate::Client`].

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};

/// Stable `User-Agent` sent on every request, so the server can tell this
/// runtime's traffic apart from other clients hitting the same endpoints.
pub const USER_AGENT_VALUE: &str = concat!("grok-rt/", env!("CARGO_PKG_VERSION"));

/// Default v1 API base url for the xAI-compatible Grok service.
pub const GROK_API_BASE: &str = "https://api.x.ai/v1";
/// Default realtime voice WebSocket URI.
pub const GROK_REALTIME_URI: &str = "wss://api.x.ai/v1/realtime";
/// Default model used when a request does not override it.
pub const GROK_DEFAULT_MODEL: &str = "grok-3-latest";

/// Environment variable consulted by [`GrokConfig::new`] for the API credential.
pub const GROK_API_KEY_ENV: &str = "GROK_API_KEY";

/// Per-client settings shared by every request the [`crate::Client`] makes.
///
/// A thin seam that lets the transport stay agnostic of exactly how
/// headers/URLs/credentials are produced, in case a future configuration
/// (e.g. a proxy-fronted deployment) needs a different `url()`/`headers()`
/// policy.
pub trait Config: Clone + Send + Sync {
    fn headers(&self) -> HeaderMap;
    fn url(&self, path: &str) -> String;
    fn api_base(&self) -> &str;
    fn api_key(&self) -> &str;
    fn default_model(&self) -> &str;
    fn timeout_ms(&self) -> u64;
    fn max_retries(&self) -> u32;
    fn default_max_tokens(&self) -> u32;
    fn default_temperature(&self) -> f32;
}

/// Concrete [`Config`] for the Grok HTTP API.
#[derive(Clone, Debug)]
pub struct GrokConfig {
    api_base: String,
    api_key: SecretString,
    default_model: String,
    timeout_ms: u64,
    max_retries: u32,
    default_max_tokens: u32,
    default_temperature: f32,
}

impl Default for GrokConfig {
    fn default() -> Self {
        Self {
            api_base: GROK_API_BASE.to_string(),
            api_key: SecretString::from(String::new()),
            default_model: GROK_DEFAULT_MODEL.to_string(),
            timeout_ms: 60_000,
            max_retries: 3,
            default_max_tokens: 1024,
            default_temperature: 1.0,
        }
    }
}

impl GrokConfig {
    /// Reads the API credential from [`GROK_API_KEY_ENV`], defaulting every
    /// other field.
    pub fn new() -> Self {
        Self {
            api_key: SecretString::from(std::env::var(GROK_API_KEY_ENV).unwrap_or_default()),
            ..Default::default()
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = SecretString::from(api_key.into());
        self
    }

    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_default_model<S: Into<String>>(mut self, model: S) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }
}

impl Config for GrokConfig {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key.expose_secret()))
            .expect("bearer token is a valid header value");
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn default_max_tokens(&self) -> u32 {
        self.default_max_tokens
    }

    fn default_temperature(&self) -> f32 {
        self.default_temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expected_values() {
        let cfg = GrokConfig::default();
        assert_eq!(cfg.api_base(), GROK_API_BASE);
        assert_eq!(cfg.timeout_ms(), 60_000);
        assert_eq!(cfg.max_retries(), 3);
        assert_eq!(cfg.default_max_tokens(), 1024);
        assert_eq!(cfg.default_temperature(), 1.0);
    }

    #[test]
    fn url_concatenates_without_encoding() {
        let cfg = GrokConfig::default().with_api_base("https://example.test/v1");
        assert_eq!(cfg.url("/chat/completions"), "https://example.test/v1/chat/completions");
    }

    #[test]
    fn bearer_header_is_sensitive() {
        let cfg = GrokConfig::default().with_api_key("secret-key");
        let headers = cfg.headers();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Bearer secret-key");
    }

    #[test]
    fn headers_include_a_stable_user_agent() {
        let cfg = GrokConfig::default();
        let headers = cfg.headers();
        assert_eq!(headers.get(USER_AGENT).unwrap().to_str().unwrap(), USER_AGENT_VALUE);
    }
}
