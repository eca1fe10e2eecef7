//! OpenAI chat-completions transport.

mod client;
mod dto;

pub use client::{OpenAiTransport, classify_status, parse_retry_after};
pub use dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole};
