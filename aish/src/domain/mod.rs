//! Domain types for the planner

mod plan;

pub use plan::{EXECUTE_USER_REQUEST, Plan, Step, StepCategory, UNKNOWN_ESTIMATE};
