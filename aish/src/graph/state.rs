//! Shared agent graph state

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::Plan;

/// State document passed between graph nodes
///
/// The planner owns `plan` and the step-tracking fields. Keys written by
/// other nodes are kept in `extra` and survive the planner untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Natural-language instruction from the user
    #[serde(default)]
    pub user_input: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,

    /// Index of the next step to execute
    #[serde(default)]
    pub current_step: usize,

    #[serde(default)]
    pub completed_steps: Vec<u32>,

    #[serde(default)]
    pub failed_steps: Vec<u32>,

    /// Everything else in the state
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgentState {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            ..Self::default()
        }
    }

    /// Install a freshly created plan and reset step tracking
    pub fn start_plan(&mut self, plan: Plan) {
        self.plan = Some(plan);
        self.current_step = 0;
        self.completed_steps.clear();
        self.failed_steps.clear();
    }

    /// Whether there is an instruction to plan
    ///
    /// Whitespace-only input counts as none, so a stray newline is answered
    /// with the empty plan instead of an LLM call.
    pub fn has_input(&self) -> bool {
        !self.user_input.trim().is_empty()
    }
}
