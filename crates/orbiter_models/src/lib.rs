//! LLM provider transports for Orbiter.
//!
//! Each transport performs one provider call per
//! [`CompletionTransport::send`](orbiter_interface::CompletionTransport::send)
//! and maps every failure onto a
//! [`TransportErrorKind`](orbiter_error::TransportErrorKind). Retries and
//! pacing live in the client, not here.
//!
//! # Available Providers
//!
//! - **OpenAI** and OpenAI-compatible chat-completions endpoints
//!
//! # Example
//!
//! ```no_run
//! use orbiter_core::{ClientSettings, TransportRequest};
//! use orbiter_interface::CompletionTransport;
//! use orbiter_models::OpenAiTransport;
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = OpenAiTransport::new(ClientSettings::from_env()?);
//! let request = TransportRequest::builder()
//!     .model("gpt-4o")
//!     .prompt("Name three Apollo landing sites")
//!     .max_output_tokens(100u32)
//!     .timeout(Duration::from_secs(60))
//!     .build()?;
//! let completion = transport.send(&request).await?;
//! println!("{}", completion.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai;

pub use openai::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole, OpenAiTransport,
    classify_status, parse_retry_after,
};
