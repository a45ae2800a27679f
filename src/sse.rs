//! A byte-level Server-Sent-Events tokenizer.
//!
//! Hand-rolled rather than delegated to an eventsource crate. The contract
//! is deliberately byte-driven so the parser can be fed from any chunk
//! boundary the transport happens to deliver, including one byte at a time.

use std::fmt;

const FIELD_CAP: usize = 16;
const DATA_CAP: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Field,
    Value,
    EndOfLine,
}

/// One tokenized SSE event, already classified for the chat/response stream
/// consumer: either a chunk of JSON text, or the stream's terminal marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// A non-`[DONE]` `data:` payload, accumulated as a complete line.
    Data(String),
    /// The literal `data: [DONE]` terminator.
    Done,
}

impl fmt::Display for SseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SseEvent::Data(s) => write!(f, "data({} bytes)", s.len()),
            SseEvent::Done => write!(f, "[DONE]"),
        }
    }
}

/// A four-state byte-driven tokenizer for `text/event-stream` bodies.
///
/// `feed` is byte-driven and side-effect free except for appending completed
/// events to an internal queue drained by [`SseTokenizer::next_event`] — this
/// lets the same tokenizer be fed a full buffer at once or one byte at a
/// time with an identical resulting event sequence.
pub struct SseTokenizer {
    state: State,
    field: String,
    data: String,
    is_data_field: bool,
    overflowed: bool,
    skip_leading_space: bool,
    ready: std::collections::VecDeque<SseEvent>,
}

impl Default for SseTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SseTokenizer {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            field: String::with_capacity(FIELD_CAP),
            data: String::with_capacity(DATA_CAP),
            is_data_field: false,
            overflowed: false,
            skip_leading_space: false,
            ready: std::collections::VecDeque::new(),
        }
    }

    /// Feeds one chunk of bytes (valid UTF-8 is assumed, as the wire is
    /// JSON); any number of bytes, including the whole stream at once or a
    /// single byte, produces the same event sequence.
    pub fn feed(&mut self, chunk: &[u8]) {
        let mut i = 0;
        while i < chunk.len() {
            let c = chunk[i] as char;
            match self.state {
                State::Idle => {
                    if c == '\n' || c == '\r' {
                        // ignore blank lines
                    } else {
                        self.field.clear();
                        self.field.push(c);
                        self.state = State::Field;
                    }
                }
                State::Field => {
                    if c == ':' {
                        self.is_data_field = self.field == "data";
                        if self.is_data_field {
                            self.data.clear();
                            self.overflowed = false;
                        }
                        self.state = State::Value;
                        self.skip_leading_space = true;
                    } else if c == '\n' || c == '\r' {
                        // incomplete field, discard
                        self.state = State::Idle;
                    } else if self.field.len() < FIELD_CAP - 1 {
                        self.field.push(c);
                    }
                }
                State::Value => {
                    if c == '\n' || c == '\r' {
                        if self.is_data_field {
                            self.dispatch_data_line();
                        }
                        self.state = State::EndOfLine;
                    } else {
                        let skip = self.skip_leading_space;
                        self.skip_leading_space = false;
                        if skip && c == ' ' {
                            // the single leading space after ':' is not part of the value
                        } else if self.is_data_field {
                            if self.data.len() < DATA_CAP {
                                self.data.push(c);
                            } else if !self.overflowed {
                                self.overflowed = true;
                                tracing::warn!("sse data buffer overflow, dropping remainder of event");
                            }
                        }
                    }
                }
                State::EndOfLine => {
                    if c == '\n' || c == '\r' {
                        // stay
                    } else {
                        self.state = State::Idle;
                        continue; // reprocess this byte in Idle without advancing i
                    }
                }
            }
            i += 1;
        }
    }

    fn dispatch_data_line(&mut self) {
        if self.overflowed {
            // the event's data was truncated; drop this event only, keep parsing.
            self.overflowed = false;
            return;
        }
        if self.data == "[DONE]" {
            self.ready.push_back(SseEvent::Done);
        } else {
            self.ready.push_back(SseEvent::Data(std::mem::take(&mut self.data)));
        }
    }

    /// Pops the next fully-tokenized event, if any are ready.
    pub fn next_event(&mut self) -> Option<SseEvent> {
        self.ready.pop_front()
    }
}

/// A parsed streaming-chat chunk: the text delta and/or terminal signal
/// extracted from one dispatched `data:` payload's `choices[0]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamChunk {
    pub content_delta: Option<String>,
    pub is_done: bool,
}

/// Parses one dispatched JSON `data:` payload into a [`StreamChunk`].
/// `[DONE]` is handled upstream by [`SseTokenizer`] and never reaches here.
pub fn parse_stream_chunk(json: &str) -> Result<StreamChunk, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let choice = value.get("choices").and_then(|c| c.get(0));
    let content_delta = choice
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    let is_done = choice
        .and_then(|c| c.get("finish_reason"))
        .map(|v| !v.is_null())
        .unwrap_or(false);
    Ok(StreamChunk { content_delta, is_done })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(tok: &mut SseTokenizer) -> Vec<SseEvent> {
        let mut out = Vec::new();
        while let Some(e) = tok.next_event() {
            out.push(e);
        }
        out
    }

    const STREAM: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n\
data: [DONE]\n\n";

    #[test]
    fn whole_buffer_at_once() {
        let mut tok = SseTokenizer::new();
        tok.feed(STREAM.as_bytes());
        let events = drain(&mut tok);
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], SseEvent::Done);
    }

    #[test]
    fn one_byte_at_a_time_matches_whole_buffer() {
        let mut whole = SseTokenizer::new();
        whole.feed(STREAM.as_bytes());
        let whole_events = drain(&mut whole);

        let mut byte_by_byte = SseTokenizer::new();
        for b in STREAM.as_bytes() {
            byte_by_byte.feed(&[*b]);
        }
        let byte_events = drain(&mut byte_by_byte);

        assert_eq!(whole_events, byte_events);
    }

    #[test]
    fn happy_path_content_deltas() {
        let mut tok = SseTokenizer::new();
        tok.feed(STREAM.as_bytes());
        let events = drain(&mut tok);
        let SseEvent::Data(d0) = &events[0] else { panic!() };
        let chunk0 = parse_stream_chunk(d0).unwrap();
        assert_eq!(chunk0.content_delta.as_deref(), Some("Hel"));
        assert!(!chunk0.is_done);

        let SseEvent::Data(d1) = &events[1] else { panic!() };
        let chunk1 = parse_stream_chunk(d1).unwrap();
        assert_eq!(chunk1.content_delta.as_deref(), Some("lo"));
    }

    #[test]
    fn finish_reason_also_signals_done() {
        let mut tok = SseTokenizer::new();
        tok.feed(b"data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n");
        let events = drain(&mut tok);
        let SseEvent::Data(d) = &events[0] else { panic!() };
        let chunk = parse_stream_chunk(d).unwrap();
        assert!(chunk.is_done);
    }

    #[test]
    fn overflow_drops_only_that_event() {
        let mut tok = SseTokenizer::new();
        let huge = "x".repeat(DATA_CAP + 10);
        let input = format!("data: {huge}\n\ndata: {{\"choices\":[{{\"delta\":{{\"content\":\"ok\"}}}}]}}\n\n");
        tok.feed(input.as_bytes());
        let events = drain(&mut tok);
        // The overflowed event is dropped; the next event still arrives.
        assert_eq!(events.len(), 1);
        let SseEvent::Data(d) = &events[0] else { panic!() };
        assert_eq!(parse_stream_chunk(d).unwrap().content_delta.as_deref(), Some("ok"));
    }

    #[test]
    fn successive_newlines_do_not_produce_spurious_events() {
        let mut tok = SseTokenizer::new();
        tok.feed(b"\n\n\n\ndata: [DONE]\n\n\n");
        let events = drain(&mut tok);
        assert_eq!(events, vec![SseEvent::Done]);
    }

    #[test]
    fn cr_terminates_lines_like_lf() {
        let mut tok = SseTokenizer::new();
        tok.feed(b"data: [DONE]\r\r");
        let events = drain(&mut tok);
        assert_eq!(events, vec![SseEvent::Done]);
    }
}
