//! Outbound wire messages and inbound event shapes for the realtime voice
//! session.
//!
//! The three outbound messages are built as plain `format!` string literals
//! rather than via `serde_json::json!`, since there is no struct to derive
//! `Serialize` for — the literal is the whole point — and caller text is
//! sanitized by substituting `"` for `'` rather than escaping it, to keep
//! construction simple and allocation-light.

use serde::Deserialize;

use super::config::VoiceSessionConfig;

/// Event-type strings the server is documented to emit.
pub mod server_event_type {
    pub const SESSION_UPDATED: &str = "session.updated";
    pub const RESPONSE_CREATED: &str = "response.created";
    pub const TRANSCRIPT_DELTA: &str = "response.output_audio_transcript.delta";
    pub const AUDIO_DELTA: &str = "response.output_audio.delta";
    pub const RESPONSE_DONE: &str = "response.done";
    pub const ERROR: &str = "error";
}

/// Replaces `"` with `'` in caller-supplied text. Not a general JSON
/// escaper: control characters and backslashes pass through unchanged.
pub(crate) fn sanitize_text(text: &str) -> String {
    text.chars().map(|c| if c == '"' { '\'' } else { c }).collect()
}

/// Builds the `session.update` message sent immediately after the
/// WebSocket handshake completes.
pub(crate) fn session_update_message(session: &VoiceSessionConfig) -> String {
    let turn_detection = if session.server_vad { r#"{"type":"server_vad"}"# } else { "null" };
    let rate = session.effective_sample_rate_hz();
    format!(
        r#"{{"type":"session.update","session":{{"voice":"{voice}","instructions":"{instructions}","turn_detection":{turn_detection},"audio":{{"input":{{"format":{{"type":"audio/pcm","rate":{rate}}}}},"output":{{"format":{{"type":"audio/pcm","rate":{rate}}}}}}}}}}}"#,
        voice = sanitize_text(&session.voice),
        instructions = sanitize_text(&session.instructions),
        turn_detection = turn_detection,
        rate = rate,
    )
}

/// Builds the `conversation.item.create` + `response.create` pair sent to
/// start one text turn.
pub(crate) fn text_turn_messages(text: &str) -> (String, String) {
    let safe = sanitize_text(text);
    let item_create = format!(
        r#"{{"type":"conversation.item.create","item":{{"type":"message","role":"user","content":[{{"type":"input_text","text":"{safe}"}}]}}}}"#,
    );
    let response_create = r#"{"type":"response.create"}"#.to_string();
    (item_create, response_create)
}

/// Shared shape of the two delta event kinds: `{"type": "...", "delta": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct DeltaEvent {
    pub delta: String,
}

/// Shape of a server `"error"` event: `{"type": "error", "message": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEvent {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_in_instructions_are_sanitized_not_escaped() {
        let mut session = VoiceSessionConfig::default();
        session.instructions = r#"say "hello""#.to_string();
        let msg = session_update_message(&session);
        assert!(msg.contains("say 'hello'"));
        assert!(!msg.contains(r#"say \"hello\""#));
    }

    #[test]
    fn session_update_includes_server_vad_when_enabled() {
        let mut session = VoiceSessionConfig::default();
        session.server_vad = true;
        let msg = session_update_message(&session);
        assert!(msg.contains(r#""turn_detection":{"type":"server_vad"}"#));
    }

    #[test]
    fn text_turn_messages_are_distinct_wire_messages() {
        let (item, response) = text_turn_messages("hi");
        assert!(item.contains("conversation.item.create"));
        assert!(item.contains("\"text\":\"hi\""));
        assert_eq!(response, r#"{"type":"response.create"}"#);
    }

    #[test]
    fn delta_event_parses_delta_field() {
        let e: DeltaEvent = serde_json::from_str(r#"{"type":"response.output_audio.delta","delta":"abcd"}"#).unwrap();
        assert_eq!(e.delta, "abcd");
    }
}
