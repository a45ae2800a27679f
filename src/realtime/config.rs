//! Realtime voice session configuration.
//!
//! One struct for transport-level knobs (endpoint, credential, timeouts,
//! buffer sizing) and one for the session itself (voice, instructions,
//! sample rate, server-side VAD).

use secrecy::SecretString;

use crate::config::{Config, GROK_REALTIME_URI};

/// Default wall-clock budget for the WebSocket handshake and any single
/// blocking network read/write, in milliseconds.
pub const DEFAULT_NETWORK_TIMEOUT_MS: u64 = 60_000;
/// Default budget reserved for an automatic-reconnect policy. This crate
/// reports state transitions only (no reconnect loop), so the field is
/// carried for config compatibility but otherwise inert.
pub const DEFAULT_RECONNECT_TIMEOUT_MS: u64 = 15_000;
/// Default cap on one reassembled WebSocket text message.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 256 * 1024;
/// Default scratch capacity for decoding one `response.output_audio.delta`.
pub const DEFAULT_PCM_BUFFER_BYTES: usize = 64 * 1024;
/// Default voice name sent in `session.update`.
pub const DEFAULT_VOICE: &str = "Ara";
/// Default system instructions sent in `session.update`.
pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant.";
/// Default input/output PCM16 sample rate, in Hz.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 24_000;

/// Per-session settings sent to the server in `session.update`.
#[derive(Debug, Clone)]
pub struct VoiceSessionConfig {
    pub voice: String,
    pub instructions: String,
    pub sample_rate_hz: u32,
    /// Enables the server's voice-activity-detection based turn-taking
    /// instead of caller-driven `response.create` turns.
    pub server_vad: bool,
    /// If a turn is requested before `session.updated` has been received,
    /// queue it and send it once the session becomes ready rather than
    /// failing with [`crate::error::GrokError::NotReady`].
    pub queue_turn_before_ready: bool,
}

impl Default for VoiceSessionConfig {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            server_vad: false,
            queue_turn_before_ready: true,
        }
    }
}

impl VoiceSessionConfig {
    /// The sample rate to advertise, falling back to the default if a
    /// caller zeroed it out.
    pub(crate) fn effective_sample_rate_hz(&self) -> u32 {
        if self.sample_rate_hz > 0 {
            self.sample_rate_hz
        } else {
            DEFAULT_SAMPLE_RATE_HZ
        }
    }
}

/// Transport-level settings for one [`super::session::VoiceClient::connect`] call.
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    pub uri: String,
    pub api_key: SecretString,
    pub network_timeout_ms: u64,
    pub reconnect_timeout_ms: u64,
    pub max_message_size: usize,
    pub pcm_buffer_bytes: usize,
    pub session: VoiceSessionConfig,
}

impl VoiceConfig {
    /// Builds a voice config from an HTTP [`Config`], reusing its API key
    /// and swapping the REST base url for the realtime WebSocket endpoint.
    pub fn from_config<C: Config>(config: &C) -> Self {
        Self {
            uri: GROK_REALTIME_URI.to_string(),
            api_key: SecretString::from(config.api_key().to_string()),
            ..Self::default()
        }
    }

    pub fn with_uri<S: Into<String>>(mut self, uri: S) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = SecretString::from(api_key.into());
        self
    }

    pub fn with_network_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.network_timeout_ms = timeout_ms;
        self
    }

    pub fn with_session(mut self, session: VoiceSessionConfig) -> Self {
        self.session = session;
        self
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            uri: GROK_REALTIME_URI.to_string(),
            api_key: SecretString::from(String::new()),
            network_timeout_ms: DEFAULT_NETWORK_TIMEOUT_MS,
            reconnect_timeout_ms: DEFAULT_RECONNECT_TIMEOUT_MS,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            pcm_buffer_bytes: DEFAULT_PCM_BUFFER_BYTES,
            session: VoiceSessionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let cfg = VoiceConfig::default();
        assert_eq!(cfg.network_timeout_ms, 60_000);
        assert_eq!(cfg.reconnect_timeout_ms, 15_000);
        assert_eq!(cfg.max_message_size, 256 * 1024);
        assert_eq!(cfg.pcm_buffer_bytes, 64 * 1024);
        assert_eq!(cfg.session.voice, "Ara");
        assert_eq!(cfg.session.sample_rate_hz, 24_000);
        assert!(!cfg.session.server_vad);
    }

    #[test]
    fn zeroed_sample_rate_falls_back_to_default() {
        let mut session = VoiceSessionConfig::default();
        session.sample_rate_hz = 0;
        assert_eq!(session.effective_sample_rate_hz(), DEFAULT_SAMPLE_RATE_HZ);
    }
}
