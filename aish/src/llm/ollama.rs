//! Ollama client implementation
//!
//! Talks to a local inference server through its `/api/chat` endpoint with
//! streaming disabled. No API key is involved.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http;
use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Ollama local server client
pub struct OllamaClient {
    model: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl OllamaClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = http::build_client(timeout)?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.trimmed_base_url().to_string(),
            http,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system_prompt},
                {"role": "user", "content": request.user_message},
            ],
            "stream": false,
            "options": {
                "temperature": request.temperature.unwrap_or(self.temperature),
                "num_predict": request.max_tokens.min(self.max_tokens),
            },
        })
    }

    fn parse_response(&self, api_response: OllamaResponse) -> Result<CompletionResponse, LlmError> {
        debug!(done = api_response.done, "parse_response: called");
        if let Some(error) = api_response.error {
            return Err(LlmError::InvalidResponse(error));
        }

        let content = api_response.message.map(|m| m.content);

        Ok(CompletionResponse {
            content,
            stop_reason: StopReason::from_finish_reason(api_response.done_reason.as_deref()),
            usage: TokenUsage {
                input_tokens: api_response.prompt_eval_count.unwrap_or(0),
                output_tokens: api_response.eval_count.unwrap_or(0),
            },
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, "complete: called");
        let body = self.build_request_body(&request);

        let response = http::post_json(&self.http, &self.endpoint(), None, &body, self.timeout).await?;

        let api_response: OllamaResponse = response.json().await?;
        self.parse_response(api_response)
    }

    fn describe(&self) -> String {
        format!("ollama/{}", self.model)
    }
}

// Ollama API response types

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
    #[serde(default)]
    done: bool,
    done_reason: Option<String>,
    prompt_eval_count: Option<u64>,
    eval_count: Option<u64>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}
