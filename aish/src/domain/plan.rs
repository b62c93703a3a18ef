//! Plan domain type
//!
//! A Plan is the ordered list of shell-executable steps produced from one
//! natural-language instruction. It carries no identity beyond position and
//! is consumed immediately by the caller.

use serde::{Deserialize, Deserializer, Serialize, de};
use tracing::debug;

/// Description used by every single-step substitute plan
pub const EXECUTE_USER_REQUEST: &str = "Execute user request";

/// Estimated time reported when the model gave nothing usable
pub const UNKNOWN_ESTIMATE: &str = "Unknown";

/// What kind of operation a step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepCategory {
    Install,
    Configure,
    Start,
    Stop,
    Check,
    Create,
    Delete,
    Update,
    #[default]
    Other,
}

impl StepCategory {
    /// All categories in prompt order
    pub const ALL: [StepCategory; 9] = [
        Self::Install,
        Self::Configure,
        Self::Start,
        Self::Stop,
        Self::Check,
        Self::Create,
        Self::Delete,
        Self::Update,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Configure => "configure",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Check => "check",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::Other => "other",
        }
    }

    /// Map a model-supplied label onto a category
    ///
    /// Matching ignores case and surrounding whitespace. Anything unknown
    /// becomes `Other` rather than failing the whole plan.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        match Self::ALL.iter().find(|c| c.as_str() == normalized) {
            Some(category) => *category,
            None => {
                debug!(%label, "StepCategory::from_label: unknown label, using other");
                Self::Other
            }
        }
    }

    /// Pipe-separated list used in the planner prompt
    pub fn prompt_list() -> String {
        Self::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>().join("|")
    }
}

impl std::fmt::Display for StepCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for StepCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(Self::from_label(&label))
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Step numbers arrive as `1` or `"1"` depending on the model
fn step_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("step number '{}' is not an integer", text))),
    }
}

/// One step of a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position reported by the model
    #[serde(deserialize_with = "step_number")]
    pub step: u32,

    /// Short human description
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,

    /// Detailed task text handed to the executor
    #[serde(deserialize_with = "null_as_default")]
    pub task: String,

    pub category: StepCategory,
}

impl Step {
    pub fn new(step: u32, description: impl Into<String>, task: impl Into<String>, category: StepCategory) -> Self {
        Self {
            step,
            description: description.into(),
            task: task.into(),
            category,
        }
    }
}

/// A structured plan derived from natural language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Ordered steps
    #[serde(rename = "plan")]
    pub steps: Vec<Step>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,

    /// Free-form estimate such as "2-3 minutes"
    #[serde(default, deserialize_with = "null_as_default")]
    pub estimated_time: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub requires_sudo: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

impl Plan {
    /// Plan returned when the node receives no instruction
    pub fn no_input() -> Self {
        debug!("Plan::no_input: called");
        Self {
            steps: vec![],
            summary: "No input provided".to_string(),
            estimated_time: "0 minutes".to_string(),
            requires_sudo: false,
            warnings: vec!["No user input provided".to_string()],
        }
    }

    /// Single-step plan wrapping raw model text that held no usable JSON
    pub fn from_raw_text(raw: &str, warning: impl Into<String>) -> Self {
        debug!(raw_len = raw.len(), "Plan::from_raw_text: called");
        Self {
            steps: vec![Step::new(1, EXECUTE_USER_REQUEST, raw.trim(), StepCategory::Other)],
            summary: EXECUTE_USER_REQUEST.to_string(),
            estimated_time: UNKNOWN_ESTIMATE.to_string(),
            requires_sudo: false,
            warnings: vec![warning.into()],
        }
    }

    /// Single-step plan wrapping the original instruction after a failure
    pub fn fallback(user_input: &str, reason: impl std::fmt::Display) -> Self {
        debug!(%reason, "Plan::fallback: called");
        Self {
            steps: vec![Step::new(1, EXECUTE_USER_REQUEST, user_input, StepCategory::Other)],
            summary: format!("{} (fallback plan)", EXECUTE_USER_REQUEST),
            estimated_time: UNKNOWN_ESTIMATE.to_string(),
            requires_sudo: false,
            warnings: vec![format!("Planning failed: {}", reason)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}
