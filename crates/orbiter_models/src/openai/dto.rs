//! OpenAI chat-completions data transfer objects.

use derive_getters::Getters;
use orbiter_core::{TokenUsage, TransportRequest};
use serde::{Deserialize, Serialize};

/// Chat message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System instructions
    System,
    /// User message
    User,
    /// Model reply
    Assistant,
}

/// Message in a chat-completions conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ChatMessage {
    /// Message role
    role: ChatRole,
    /// Message content
    content: String,
}

impl ChatMessage {
    fn new(role: ChatRole, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
        }
    }
}

/// Body of a `POST /chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ChatCompletionRequest {
    /// Model identifier
    model: String,
    /// System prompt (if any) followed by the user prompt
    messages: Vec<ChatMessage>,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl From<&TransportRequest> for ChatCompletionRequest {
    fn from(request: &TransportRequest) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt() {
            messages.push(ChatMessage::new(ChatRole::System, system));
        }
        messages.push(ChatMessage::new(ChatRole::User, request.prompt()));

        Self {
            model: request.model().clone(),
            messages,
            max_tokens: *request.max_output_tokens(),
            temperature: *request.temperature(),
        }
    }
}

/// Message returned inside a choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatResponseMessage {
    /// Generated text; absent for refusals and tool calls
    #[serde(default)]
    content: Option<String>,
}

/// One candidate completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatChoice {
    /// The generated message
    message: ChatResponseMessage,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Usage block of a chat-completions response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatUsage {
    /// Input tokens consumed
    #[serde(default)]
    prompt_tokens: u64,
    /// Output tokens generated
    #[serde(default)]
    completion_tokens: u64,
    /// Total tokens billed
    #[serde(default)]
    total_tokens: Option<u64>,
}

impl From<ChatUsage> for TokenUsage {
    fn from(usage: ChatUsage) -> Self {
        match usage.total_tokens {
            Some(total) => {
                TokenUsage::reported(usage.prompt_tokens, usage.completion_tokens, total)
            }
            None => TokenUsage::new(usage.prompt_tokens, usage.completion_tokens),
        }
    }
}

/// Successful chat-completions response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatCompletionResponse {
    /// Candidate completions
    #[serde(default)]
    choices: Vec<ChatChoice>,
    /// Token usage, when reported
    #[serde(default)]
    usage: Option<ChatUsage>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the provider returned any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(system: Option<&str>) -> TransportRequest {
        let mut builder = TransportRequest::builder();
        builder
            .model("gpt-4o")
            .prompt("Plot a free-return trajectory")
            .max_output_tokens(300u32)
            .temperature(0.1)
            .timeout(Duration::from_secs(60));
        if let Some(system) = system {
            builder.system_prompt(system);
        }
        builder.build().unwrap()
    }

    #[test]
    fn system_prompt_goes_first() {
        let body = ChatCompletionRequest::from(&request(Some("You are a flight dynamics officer.")));
        assert_eq!(body.messages().len(), 2);
        assert_eq!(*body.messages()[0].role(), ChatRole::System);
        assert_eq!(*body.messages()[1].role(), ChatRole::User);
        assert_eq!(*body.max_tokens(), 300);
    }

    #[test]
    fn serializes_openai_shape() {
        let body = ChatCompletionRequest::from(&request(None));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Plot a free-return trajectory");
    }

    #[test]
    fn usage_without_total_sums_parts() {
        let usage: ChatUsage =
            serde_json::from_str(r#"{"prompt_tokens": 12, "completion_tokens": 30}"#).unwrap();
        assert_eq!(*TokenUsage::from(usage).total_tokens(), 42);
    }

    #[test]
    fn missing_content_is_none() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#).unwrap();
        assert_eq!(response.first_content(), None);
    }
}
