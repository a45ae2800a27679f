//! Async Rust client runtime for the Grok chat, image, tokenize, and
//! realtime voice APIs.
//!
//! ## Creating a client
//!
//! ```no_run
//! use grok_rt::Client;
//!
//! // Reads the API key from GROK_API_KEY and uses every other default.
//! let client = Client::new();
//!
//! // OR supply the key directly.
//! let client = Client::with_config(grok_rt::GrokConfig::default().with_api_key("xai-..."));
//! ```
//!
//! ## Chat completion
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! use grok_rt::Client;
//! use grok_rt::types::{CreateChatRequest, Message};
//!
//! let client = Client::new();
//! let request = CreateChatRequest {
//!     messages: vec![Message::user("Tell me a joke about the universe")],
//!     ..Default::default()
//! };
//! let response = client.chat().create(request).await.unwrap();
//! println!("{}", response.content().unwrap_or_default());
//! # });
//! ```
//!
//! ## Realtime voice
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! use grok_rt::realtime::{VoiceClient, VoiceConfig};
//!
//! let config = VoiceConfig::default().with_api_key("xai-...");
//! let (voice, mut events) = VoiceClient::connect(config).await.unwrap();
//! voice.send_text_turn("Hello there").await.unwrap();
//! # let _ = events;
//! # });
//! ```

mod buffer_pool;
mod chat;
mod client;
mod conversation;
pub mod config;
pub mod error;
mod http_client;
mod image;
mod model;
pub mod realtime;
mod responses;
mod sse;
mod tokenize;
pub mod tools;
pub mod types;

pub use buffer_pool::{BufferHandle, BufferPool};
pub use chat::Chat;
pub use client::Client;
pub use conversation::Conversation;
pub use config::{Config, GrokConfig};
pub use error::GrokError;
pub use image::Images;
pub use model::Models;
pub use responses::Responses;
pub use sse::{SseEvent, StreamChunk};
pub use tokenize::Tokenize;
