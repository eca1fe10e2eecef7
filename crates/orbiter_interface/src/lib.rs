//! Trait definitions for the Orbiter resilient LLM client.
//!
//! [`CompletionTransport`] is the only thing a provider integration has to
//! implement; [`OutcomeClass`] tags how each attempt ended.

mod traits;
mod types;

pub use traits::CompletionTransport;
pub use types::OutcomeClass;
