//! aish - natural language to shell-step planning
//!
//! The planner node of the aish agent graph. Given an instruction such as
//! "install nginx and start the service", it asks a language model for an
//! ordered list of shell-executable steps and folds the result into the
//! shared graph state.
//!
//! # Core Concepts
//!
//! - **Always a plan**: LLM errors, malformed JSON and missing fields all
//!   degrade to a valid single-step fallback plan
//! - **Pluggable backends**: hosted OpenAI or a local Ollama server
//! - **State in, state out**: the node merges the plan and step tracking
//!   into the state and preserves everything else
//!
//! # Modules
//!
//! - [`planning`] - Planner, response parsing and validation
//! - [`graph`] - Agent state and the planner node
//! - [`llm`] - LLM client trait and backends
//! - [`prompts`] - Planner prompt template loading
//! - [`domain`] - Plan and Step types
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod graph;
pub mod llm;
pub mod planning;
pub mod prompts;
pub mod render;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{Plan, Step, StepCategory};
pub use graph::{AgentState, Node, PlannerNode};
pub use llm::{
    CompletionRequest, CompletionResponse, LlmClient, LlmError, OllamaClient, OpenAIClient, create_client,
};
pub use planning::{PlanError, Planner, PlannerConfig, parse_response};
pub use prompts::PromptLoader;
