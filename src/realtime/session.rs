//! The realtime voice session: WebSocket lifecycle, turn state machine, and
//! PCM16 delta decoding.
//!
//! State transitions and events are delivered as an `mpsc` channel of
//! [`VoiceEvent`]s exposed as a `Stream` rather than a caller-supplied
//! callback. Because `tokio_tungstenite::connect_async` performs the entire
//! handshake before returning, there is no separate "connecting" network
//! event to wait on; `VoiceState::Connecting` is reported synchronously
//! before the handshake starts and `VoiceState::Connected` right after it
//! completes, both inside one `async fn connect`.
//!
//! `tokio_tungstenite` reassembles WebSocket fragmentation internally and
//! only ever surfaces complete `Message::Text` frames, so every inbound
//! text message is fed to [`crate::realtime::assembler::FrameAssembler`] as
//! a single `payload_offset == 0, fin == true` fragment. The assembler
//! still bounds message size against `max_message_size` even though it
//! never sees a second fragment over this transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine;
use futures::{SinkExt, StreamExt};
use serde::de::Error as _;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::buffer_pool::{BufferHandle, BufferPool};
use crate::error::GrokError;
use crate::realtime::assembler::FrameAssembler;
use crate::realtime::config::VoiceConfig;
use crate::realtime::events::{self, server_event_type, DeltaEvent, ErrorEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = futures::stream::SplitSink<WsStream, Message>;

/// Observable lifecycle of one [`VoiceClient`] connection.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceState {
    Disconnected,
    Connecting,
    Connected,
    SessionReady,
    TurnStarted,
    TurnDone,
    /// A non-fatal protocol or transport error. The underlying connection
    /// may still be open: frames keep being delivered after an error is
    /// reported rather than tearing the socket down automatically.
    Error(String),
}

/// One event emitted on the stream returned by [`VoiceClient::connect`].
#[derive(Debug, Clone)]
pub enum VoiceEvent {
    StateChanged(VoiceState),
    /// Incremental text of the model's spoken response, as it is
    /// transcribed.
    TranscriptDelta(String),
    /// Incremental PCM16 mono audio samples, little-endian, at the
    /// session's negotiated sample rate.
    Pcm16Delta { samples: Arc<[i16]>, sample_rate_hz: u32 },
}

enum Command {
    SendTextTurn(String, oneshot::Sender<Result<(), GrokError>>),
    Disconnect(oneshot::Sender<()>),
}

struct Shared {
    state: Mutex<VoiceState>,
    connected: AtomicBool,
    session_ready: AtomicBool,
}

/// Handle to a connected realtime voice session. Cheap to clone; every
/// public method hands off to the session's single background task, which
/// serializes all access to the connection and its state.
#[derive(Clone)]
pub struct VoiceClient {
    cmd_tx: mpsc::UnboundedSender<Command>,
    shared: Arc<Shared>,
}

fn ws_closed() -> GrokError {
    GrokError::WsFailed(tokio_tungstenite::tungstenite::Error::ConnectionClosed)
}

fn build_request(config: &VoiceConfig) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request, GrokError> {
    use secrecy::ExposeSecret;

    let mut request = config.uri.as_str().into_client_request()?;
    let auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
        .map_err(|_| GrokError::InvalidArgument("api key is not a valid header value".into()))?;
    request.headers_mut().insert("Authorization", auth);
    Ok(request)
}

impl VoiceClient {
    /// Opens the WebSocket connection, sends `session.update`, and spawns
    /// the background task driving the session state machine. Returns
    /// immediately with a handle and an event stream once the handshake
    /// completes; session readiness (`session.updated`) arrives later on
    /// the stream.
    pub async fn connect(config: VoiceConfig) -> Result<(Self, UnboundedReceiverStream<VoiceEvent>), GrokError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            state: Mutex::new(VoiceState::Connecting),
            connected: AtomicBool::new(false),
            session_ready: AtomicBool::new(false),
        });
        let _ = event_tx.send(VoiceEvent::StateChanged(VoiceState::Connecting));

        let request = build_request(&config)?;
        let handshake = connect_async(request);
        let (ws_stream, _response) = tokio::time::timeout(Duration::from_millis(config.network_timeout_ms), handshake)
            .await
            .map_err(|_| GrokError::Timeout)??;

        shared.connected.store(true, Ordering::SeqCst);
        set_state(&shared, &event_tx, VoiceState::Connected);

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let task_shared = shared.clone();
        tokio::spawn(run_session(ws_stream, config, cmd_rx, event_tx, task_shared));

        Ok((Self { cmd_tx, shared }, UnboundedReceiverStream::new(event_rx)))
    }

    /// The most recently reported lifecycle state.
    pub fn state(&self) -> VoiceState {
        self.shared.state.lock().expect("voice state mutex poisoned").clone()
    }

    /// Whether the WebSocket transport is currently open. Unlike
    /// [`VoiceClient::state`], this does not flip to `false` on a non-fatal
    /// protocol error; only an actual disconnect clears it.
    pub fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    /// Whether `session.updated` has been received and a turn can be sent
    /// without queuing.
    pub fn is_ready(&self) -> bool {
        self.shared.session_ready.load(Ordering::SeqCst)
    }

    /// Starts one text turn: `conversation.item.create` followed by
    /// `response.create`. Fails with [`GrokError::Busy`] if a turn is
    /// already in flight, or [`GrokError::NotReady`] if the session isn't
    /// ready yet and [`crate::realtime::config::VoiceSessionConfig::queue_turn_before_ready`]
    /// is `false`.
    pub async fn send_text_turn(&self, text: impl Into<String>) -> Result<(), GrokError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SendTextTurn(text.into(), tx))
            .map_err(|_| ws_closed())?;
        rx.await.map_err(|_| ws_closed())?
    }

    /// Closes the WebSocket and tears down the background task.
    pub async fn disconnect(&self) -> Result<(), GrokError> {
        let (tx, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Disconnect(tx)).is_err() {
            return Ok(());
        }
        let _ = rx.await;
        Ok(())
    }
}

fn set_state(shared: &Arc<Shared>, event_tx: &mpsc::UnboundedSender<VoiceEvent>, state: VoiceState) {
    *shared.state.lock().expect("voice state mutex poisoned") = state.clone();
    let _ = event_tx.send(VoiceEvent::StateChanged(state));
}

async fn send_turn_messages(write: &mut WsSink, text: &str) -> Result<(), GrokError> {
    let (item_create, response_create) = events::text_turn_messages(text);
    write.send(Message::Text(item_create.into())).await?;
    write.send(Message::Text(response_create.into())).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_send_text_turn(
    config: &VoiceConfig,
    shared: &Arc<Shared>,
    pending_text: &mut Option<String>,
    in_turn: &mut bool,
    write: &mut WsSink,
    text: String,
) -> Result<(), GrokError> {
    if !shared.session_ready.load(Ordering::SeqCst) {
        if config.session.queue_turn_before_ready {
            *pending_text = Some(text);
            return Ok(());
        }
        return Err(GrokError::NotReady);
    }
    if *in_turn {
        return Err(GrokError::Busy);
    }
    send_turn_messages(write, &text).await?;
    *in_turn = true;
    Ok(())
}

/// Decodes one `response.output_audio.delta` payload into PCM16 samples,
/// decoding into a reused scratch buffer rather than a fresh heap
/// allocation per delta.
fn decode_pcm16_delta(b64: &str, scratch: &mut [u8]) -> Result<Vec<i16>, GrokError> {
    let engine = base64::engine::general_purpose::STANDARD;
    let out_len = engine
        .decode_slice(b64, scratch)
        .map_err(|e| GrokError::ParseFailed(serde_json::Error::custom(format!("base64 decode failed: {e}")), b64.to_string()))?;
    if out_len % 2 != 0 {
        return Err(GrokError::ParseFailed(
            serde_json::Error::custom("pcm16 odd bytecount"),
            format!("{out_len} bytes"),
        ));
    }
    Ok(scratch[..out_len]
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

#[allow(clippy::too_many_arguments)]
async fn handle_json_message(
    payload: &[u8],
    config: &VoiceConfig,
    pcm_pool: &BufferPool,
    pcm_handle: &BufferHandle,
    pending_text: &mut Option<String>,
    in_turn: &mut bool,
    write: &mut WsSink,
    event_tx: &mpsc::UnboundedSender<VoiceEvent>,
    shared: &Arc<Shared>,
) {
    let value: serde_json::Value = match serde_json::from_slice(payload) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "voice session: malformed event JSON, discarding");
            set_state(shared, event_tx, VoiceState::Error("json parse failed".into()));
            return;
        }
    };
    let event_type = value.get("type").and_then(|t| t.as_str()).unwrap_or("");

    match event_type {
        t if t == server_event_type::SESSION_UPDATED => {
            shared.session_ready.store(true, Ordering::SeqCst);
            set_state(shared, event_tx, VoiceState::SessionReady);
            if let Some(text) = pending_text.take() {
                if let Err(e) = send_turn_messages(write, &text).await {
                    tracing::warn!(error = %e, "voice session: failed to send queued turn");
                } else {
                    *in_turn = true;
                }
            }
        }
        t if t == server_event_type::RESPONSE_CREATED => {
            set_state(shared, event_tx, VoiceState::TurnStarted);
        }
        t if t == server_event_type::TRANSCRIPT_DELTA => match serde_json::from_value::<DeltaEvent>(value) {
            Ok(delta) => {
                let _ = event_tx.send(VoiceEvent::TranscriptDelta(delta.delta));
            }
            Err(e) => tracing::warn!(error = %e, "voice session: malformed transcript delta"),
        },
        t if t == server_event_type::AUDIO_DELTA => match serde_json::from_value::<DeltaEvent>(value) {
            Ok(delta) => match pcm_pool.with_buffer_mut(pcm_handle, |buf| decode_pcm16_delta(&delta.delta, buf)) {
                Ok(samples) => {
                    let _ = event_tx.send(VoiceEvent::Pcm16Delta {
                        samples: Arc::from(samples),
                        sample_rate_hz: config.session.effective_sample_rate_hz(),
                    });
                }
                Err(e) => set_state(shared, event_tx, VoiceState::Error(e.to_string())),
            },
            Err(e) => tracing::warn!(error = %e, "voice session: malformed audio delta"),
        },
        t if t == server_event_type::RESPONSE_DONE => {
            *in_turn = false;
            set_state(shared, event_tx, VoiceState::TurnDone);
        }
        t if t == server_event_type::ERROR => {
            let message = serde_json::from_value::<ErrorEvent>(value)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "voice session error".to_string());
            set_state(shared, event_tx, VoiceState::Error(message));
        }
        // Includes the server's "ping" keepalive event and any event type
        // this crate doesn't model; both are discarded at the session layer.
        _ => {}
    }
}

fn reset_on_disconnect(
    shared: &Arc<Shared>,
    event_tx: &mpsc::UnboundedSender<VoiceEvent>,
    assembler: &mut FrameAssembler,
    pending_text: &mut Option<String>,
    in_turn: &mut bool,
) {
    shared.connected.store(false, Ordering::SeqCst);
    shared.session_ready.store(false, Ordering::SeqCst);
    *in_turn = false;
    *pending_text = None;
    assembler.reset();
    set_state(shared, event_tx, VoiceState::Disconnected);
}

async fn run_session(
    ws: WsStream,
    config: VoiceConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    event_tx: mpsc::UnboundedSender<VoiceEvent>,
    shared: Arc<Shared>,
) {
    let (mut write, mut read) = ws.split();
    let mut assembler = FrameAssembler::new(config.max_message_size);
    // A single-slot pool backs the PCM decode scratch buffer, reused across
    // every audio delta of the session rather than a fresh allocation per
    // delta; the assembler above keeps its own buffer since its offset-
    // addressed contract is distinct from this pool's acquire/release one.
    let pcm_pool = BufferPool::new(1, config.pcm_buffer_bytes);
    let pcm_handle = pcm_pool.acquire().expect("freshly created pool always has a free slot");
    let mut pending_text: Option<String> = None;
    let mut in_turn = false;

    if let Err(e) = write.send(Message::Text(events::session_update_message(&config.session).into())).await {
        set_state(&shared, &event_tx, VoiceState::Error(format!("session.update send failed: {e}")));
    }

    loop {
        tokio::select! {
            incoming = read.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let bytes = text.as_bytes();
                        if assembler.feed_text(bytes.len(), 0, bytes, true) {
                            let payload = assembler.message().to_vec();
                            handle_json_message(
                                &payload,
                                &config,
                                &pcm_pool,
                                &pcm_handle,
                                &mut pending_text,
                                &mut in_turn,
                                &mut write,
                                &event_tx,
                                &shared,
                            )
                            .await;
                        } else if bytes.len() > config.max_message_size {
                            set_state(&shared, &event_tx, VoiceState::Error("message exceeds max_message_size".into()));
                        }
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        let _ = write.send(Message::Pong(payload)).await;
                    }
                    Some(Ok(Message::Pong(_))) | Some(Ok(Message::Frame(_))) => {}
                    Some(Ok(Message::Binary(_))) => {
                        tracing::debug!("voice session: ignoring unexpected binary frame");
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        reset_on_disconnect(&shared, &event_tx, &mut assembler, &mut pending_text, &mut in_turn);
                        break;
                    }
                    Some(Err(e)) => {
                        set_state(&shared, &event_tx, VoiceState::Error(format!("websocket error: {e}")));
                    }
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::SendTextTurn(text, reply)) => {
                        let result = handle_send_text_turn(&config, &shared, &mut pending_text, &mut in_turn, &mut write, text).await;
                        let _ = reply.send(result);
                    }
                    Some(Command::Disconnect(reply)) => {
                        let _ = write.close().await;
                        reset_on_disconnect(&shared, &event_tx, &mut assembler, &mut pending_text, &mut in_turn);
                        let _ = reply.send(());
                        break;
                    }
                    None => {
                        reset_on_disconnect(&shared, &event_tx, &mut assembler, &mut pending_text, &mut in_turn);
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_pcm16_delta_rejects_odd_bytecount() {
        // base64 for 3 raw bytes decodes to an odd sample-byte count.
        let b64 = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3]);
        let mut scratch = vec![0u8; 16];
        let err = decode_pcm16_delta(&b64, &mut scratch).unwrap_err();
        assert!(matches!(err, GrokError::ParseFailed(_, _)));
    }

    #[test]
    fn decode_pcm16_delta_produces_little_endian_samples() {
        let b64 = base64::engine::general_purpose::STANDARD.encode([0x34u8, 0x12, 0xCD, 0xAB]);
        let mut scratch = vec![0u8; 16];
        let samples = decode_pcm16_delta(&b64, &mut scratch).unwrap();
        assert_eq!(samples, vec![0x1234, -0x5433]);
    }
}
