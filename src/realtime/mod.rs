//! The realtime voice session: a WebSocket client speaking the server's
//! session/turn protocol for low-latency bidirectional voice.

pub mod assembler;
pub mod config;
mod events;
pub mod session;

pub use assembler::FrameAssembler;
pub use config::{VoiceConfig, VoiceSessionConfig};
pub use session::{VoiceClient, VoiceEvent, VoiceState};
