//! LLM request/response types
//!
//! Provider-agnostic shapes for a single chat completion. Each backend
//! converts these to and from its own wire format.

use tracing::debug;

/// A completion request - one system prompt, one user turn
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System prompt (rendered from the planner template)
    pub system_prompt: String,

    /// The user's instruction, sent verbatim
    pub user_message: String,

    /// Max tokens for response, capped by the client's configured limit
    pub max_tokens: u32,

    /// Sampling temperature; the client default applies when unset
    pub temperature: Option<f32>,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Plain text response with no usage accounting
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    /// Text content, or the empty string when the model returned none
    pub fn content_str(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Output was cut off by the token limit
    pub fn is_truncated(&self) -> bool {
        self.stop_reason == StopReason::MaxTokens
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
}

impl StopReason {
    /// Parse from an OpenAI `finish_reason` or Ollama `done_reason`
    pub fn from_finish_reason(reason: Option<&str>) -> Self {
        debug!(?reason, "StopReason::from_finish_reason: called");
        match reason {
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        }
    }
}

/// Token usage as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}
