//! Planner - LLM-driven decomposition of an instruction into shell steps
//!
//! Builds the system prompt, sends the instruction to the configured LLM and
//! parses the reply. Every failure degrades to a single-step fallback plan;
//! nothing is raised to the caller.

use std::sync::Arc;

use eyre::{Context, Result};
use tracing::{debug, info, warn};

use super::{PlanError, parse_response};
use crate::config::Config;
use crate::domain::Plan;
use crate::llm::{CompletionRequest, LlmClient, create_client};
use crate::prompts::PromptLoader;

/// Configuration for the planner
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Max tokens requested per completion
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Log instruction and raw response text
    pub debug: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.1,
            debug: false,
        }
    }
}

/// Planner turns natural-language instructions into Plans
pub struct Planner {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
    config: PlannerConfig,
}

impl Planner {
    /// Create a new planner
    pub fn new(llm: Arc<dyn LlmClient>, system_prompt: impl Into<String>, config: PlannerConfig) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            config,
        }
    }

    /// Build a planner from application configuration
    ///
    /// Creates the LLM client and renders the system prompt once.
    pub fn from_config(config: &Config) -> Result<Self> {
        debug!(provider = %config.llm.provider, "Planner::from_config: called");
        let llm = create_client(&config.llm).context("Failed to create LLM client")?;

        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let system_prompt = PromptLoader::new(cwd)
            .with_override(config.prompt_path.clone())
            .planner_prompt()
            .context("Failed to load planner prompt")?;

        info!(client = %llm.describe(), "Planner initialized");

        Ok(Self::new(
            llm,
            system_prompt,
            PlannerConfig {
                max_tokens: config.llm.max_tokens,
                temperature: config.llm.temperature,
                debug: config.debug,
            },
        ))
    }

    /// Create a plan from natural language input
    ///
    /// Always returns a usable plan. Blank input yields the empty plan
    /// without calling the LLM.
    pub async fn plan(&self, user_input: &str) -> Plan {
        debug!(input_len = user_input.len(), "Planner::plan: called");
        if user_input.trim().is_empty() {
            debug!("Planner::plan: blank input, skipping LLM");
            return Plan::no_input();
        }

        match self.try_plan(user_input).await {
            Ok(plan) => {
                info!(step_count = plan.len(), "Plan created");
                plan
            }
            Err(e) => {
                warn!(error = %e, "Planning failed, using fallback plan");
                Plan::fallback(user_input, &e)
            }
        }
    }

    /// Plan without the fallback, surfacing the failure
    ///
    /// An empty or whitespace-only reply is an error here rather than a
    /// raw-text step: there is no text worth handing to an executor, so the
    /// caller's instruction is used instead via the fallback plan.
    pub async fn try_plan(&self, user_input: &str) -> Result<Plan, PlanError> {
        let request = CompletionRequest {
            system_prompt: self.system_prompt.clone(),
            user_message: user_input.to_string(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        };

        if self.config.debug {
            debug!(client = %self.llm.describe(), input = %user_input, "Sending to LLM");
        }

        let response = self.llm.complete(request).await?;
        let content = response.content_str();

        if self.config.debug {
            debug!(response = %content, usage = response.usage.total(), "LLM response");
        }

        if response.is_truncated() {
            warn!(
                max_tokens = self.config.max_tokens,
                "LLM response hit the token limit, plan may be incomplete"
            );
        }

        if content.trim().is_empty() {
            return Err(PlanError::EmptyResponse);
        }

        parse_response(content)
    }
}
