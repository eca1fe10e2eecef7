//! Token estimation and usage accounting.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Characters per token used by the estimation heuristic.
const CHARS_PER_TOKEN: u64 = 4;

/// Token usage statistics for a single LLM operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct TokenUsage {
    /// Tokens in the prompt/input.
    prompt_tokens: u64,
    /// Tokens in the response/output.
    completion_tokens: u64,
    /// Total tokens (prompt + completion).
    total_tokens: u64,
}

impl TokenUsage {
    /// Create a new token usage record.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }

    /// Usage as reported by a provider, whose total may include tokens
    /// counted in neither prompt nor completion.
    pub fn reported(prompt_tokens: u64, completion_tokens: u64, total_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: total_tokens.max(prompt_tokens.saturating_add(completion_tokens)),
        }
    }

    /// Usage where only the total is known.
    pub fn from_total(total_tokens: u64) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens,
        }
    }
}

/// Conservative token estimate for a request.
///
/// Counts roughly one token per four characters of input (rounded up) and
/// assumes the full output allowance will be used. The result never
/// decreases when the input or output allowance grows.
///
/// # Examples
///
/// ```
/// use orbiter_core::estimate_tokens;
///
/// assert_eq!(estimate_tokens(None, "abcd", 10), 11);
/// assert_eq!(estimate_tokens(Some("sys"), "abcd", 10), 12);
/// ```
pub fn estimate_tokens(system_prompt: Option<&str>, prompt: &str, max_output_tokens: u32) -> u64 {
    let chars = system_prompt.map_or(0, |s| s.chars().count()) + prompt.chars().count();
    (chars as u64).div_ceil(CHARS_PER_TOKEN) + u64::from(max_output_tokens)
}
