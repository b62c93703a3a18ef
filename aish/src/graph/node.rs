//! Graph node trait and the planner node

use async_trait::async_trait;
use tracing::{debug, info};

use super::AgentState;
use crate::domain::Plan;
use crate::planning::Planner;

/// A step in the agent graph: takes the state, returns the updated state
#[async_trait]
pub trait Node: Send + Sync {
    /// Node name used in logs and graph wiring
    fn name(&self) -> &str;

    async fn run(&self, state: AgentState) -> AgentState;
}

/// Graph node that plans tasks from natural language input
pub struct PlannerNode {
    planner: Planner,
}

impl PlannerNode {
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }
}

#[async_trait]
impl Node for PlannerNode {
    fn name(&self) -> &str {
        "planner"
    }

    async fn run(&self, mut state: AgentState) -> AgentState {
        debug!(input_len = state.user_input.len(), "PlannerNode::run: called");

        if !state.has_input() {
            info!("No user input provided, returning empty plan");
            state.plan = Some(Plan::no_input());
            return state;
        }

        let plan = self.planner.plan(&state.user_input).await;
        state.start_plan(plan);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::llm::LlmError;
    use crate::llm::client::mock::MockLlmClient;
    use crate::planning::PlannerConfig;

    const PLAN: &str = r#"{"plan": [{"step": 1, "description": "Check disk", "task": "Show disk usage", "category": "check"}], "summary": "Disk usage"}"#;

    fn node(client: Arc<MockLlmClient>) -> PlannerNode {
        PlannerNode::new(Planner::new(client, "SYSTEM", PlannerConfig::default()))
    }

    #[tokio::test]
    async fn test_empty_input_returns_empty_plan() {
        let client = Arc::new(MockLlmClient::new(vec![]));
        let mut state = AgentState::new("");
        state.current_step = 2;
        state.completed_steps = vec![1, 2];

        let state = node(client.clone()).run(state).await;

        assert_eq!(state.plan, Some(Plan::no_input()));
        // Tracking fields are left as they were
        assert_eq!(state.current_step, 2);
        assert_eq!(state.completed_steps, vec![1, 2]);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_plan_merged_into_state() {
        let client = Arc::new(MockLlmClient::with_text(PLAN));
        let mut state = AgentState::new("how full is my disk");
        state.current_step = 5;
        state.failed_steps = vec![4];
        state.extra.insert("session_id".to_string(), serde_json::json!("s-1"));

        let state = node(client).run(state).await;

        let plan = state.plan.unwrap();
        assert_eq!(plan.summary, "Disk usage");
        assert_eq!(state.current_step, 0);
        assert!(state.completed_steps.is_empty());
        assert!(state.failed_steps.is_empty());
        assert_eq!(state.user_input, "how full is my disk");
        assert_eq!(state.extra["session_id"], "s-1");
    }

    #[tokio::test]
    async fn test_failure_still_produces_plan() {
        let client = Arc::new(MockLlmClient::with_error(LlmError::InvalidResponse("garbage".to_string())));
        let state = node(client).run(AgentState::new("update all packages")).await;

        let plan = state.plan.unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps[0].task, "update all packages");
        assert!(plan.warnings[0].starts_with("Planning failed:"));
        assert_eq!(state.current_step, 0);
    }

    #[test]
    fn test_node_name() {
        let client = Arc::new(MockLlmClient::new(vec![]));
        assert_eq!(node(client).name(), "planner");
    }
}
