//! Errors raised by the LLM backends
//!
//! The planner never shows these to its caller directly; they end up as the
//! reason text of a fallback plan, so the messages are written for humans.

use std::time::Duration;
use thiserror::Error;

use super::http::is_retryable_status;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key not found. Set the {env} environment variable.")]
    MissingApiKey { env: String },

    #[error("Unknown LLM provider: '{0}'. Supported: openai, ollama")]
    UnknownProvider(String),

    #[error("Rate limited, retry after {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Whether sending the same request again could succeed
    ///
    /// Rate limiting is excluded: the server asked us to wait, and the
    /// planner would rather fall back than stall.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ApiError { status, .. } => is_retryable_status(*status),
            Self::Network(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}
