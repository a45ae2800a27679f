//! Wire data model: messages, requests, responses, and the supporting
//! image/tokenize/model shapes.

pub mod image;
pub mod message;
pub mod model;
pub mod request;
pub mod response;
pub mod tokenize;

pub use image::{ImageData, ImageGenerationRequest, ImageGenerationResponse};
pub use message::{Content, ContentPart, ImageDetail, ImageRef, Message, Role, ToolCallFunction, ToolCallRequest};
pub use model::{lookup as lookup_model, recommended_model, ModelInfo, MODEL_DATABASE};
pub use request::{CreateChatRequest, CreateChatRequestBuilder, SearchMode, SearchParams, SearchSource};
pub use response::{ChatResponse, Choice, Citation, CitationDetail, FinishReason, ResponseMessage, Usage};
pub use tokenize::{estimate_memory, TokenizeRequest, TokenizeResponse};
