//! Agent graph plumbing
//!
//! The planner is one node of a larger graph. Nodes read the shared
//! [`AgentState`] and hand back an updated copy.

mod node;
mod state;

pub use node::{Node, PlannerNode};
pub use state::AgentState;
