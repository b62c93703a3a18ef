//! Planning module - natural language to ordered shell steps
//!
//! ```text
//! instruction → Planner → LLM → parse_response → validate → Plan
//!                  │                                  │
//!                  └────────── fallback plan ◄────────┘ (any error)
//! ```

mod parse;
mod planner;

use thiserror::Error;

use crate::llm::LlmError;

pub use parse::{
    MALFORMED_JSON_WARNING, NO_JSON_WARNING, REQUIRED_STEP_FIELDS, extract_json_block, parse_response, validate,
};
pub use planner::{Planner, PlannerConfig};

/// Reasons a planning attempt is replaced by the fallback plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("Plan must contain a list of steps")]
    MissingSteps,

    #[error("Each step must have step, description, task, and category fields")]
    IncompleteStep { index: usize },

    #[error("Plan does not match the expected schema: {0}")]
    Schema(serde_json::Error),
}
