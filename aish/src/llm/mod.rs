//! LLM Client module for aish
//!
//! Provides the completion client trait and the OpenAI and Ollama backends.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod http;
mod ollama;
mod openai;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "openai" and "ollama" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        "ollama" => {
            debug!("create_client: creating Ollama client");
            Ok(Arc::new(OllamaClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_ollama_client() {
        let client = create_client(&LlmConfig::ollama()).unwrap();
        assert_eq!(client.describe(), "ollama/llama3.2");
    }

    #[test]
    fn test_create_unknown_provider_fails() {
        let config = LlmConfig {
            provider: "bard".to_string(),
            ..LlmConfig::default()
        };
        let err = create_client(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown LLM provider: 'bard'"));
    }

    #[test]
    fn test_create_openai_without_key_fails() {
        let config = LlmConfig {
            api_key_env: "AISH_TEST_NEVER_SET_KEY".to_string(),
            ..LlmConfig::default()
        };
        assert!(matches!(create_client(&config), Err(LlmError::MissingApiKey { .. })));
    }
}
