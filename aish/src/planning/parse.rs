//! Response parsing and validation
//!
//! Turns raw model text into a [`Plan`]. Text that holds no usable JSON is
//! wrapped into a single-step plan here; JSON that parses but lacks the
//! required shape is rejected so the planner can fall back.

use serde_json::Value;
use tracing::{debug, warn};

use super::PlanError;
use crate::domain::Plan;

/// Warning attached when the response had no brace-delimited JSON at all
pub const NO_JSON_WARNING: &str = "Could not parse detailed plan";

/// Warning attached when a JSON candidate failed to parse
pub const MALFORMED_JSON_WARNING: &str = "Could not parse LLM response";

/// Keys every step object must carry
pub const REQUIRED_STEP_FIELDS: [&str; 4] = ["step", "description", "task", "category"];

/// What the raw text yielded before validation
#[derive(Debug)]
enum Decoded {
    Json(Value),
    NoJson,
    Malformed(String),
}

/// Parse a model response into a plan
///
/// Direct JSON parse when the trimmed text opens with `{`, otherwise the span
/// from the first `{` to the last `}`. Text without any `{` becomes the single
/// step with [`NO_JSON_WARNING`]; text whose JSON fails to parse, including an
/// unclosed `{`, gets [`MALFORMED_JSON_WARNING`]. Structural validation errors
/// are returned to the caller.
pub fn parse_response(response: &str) -> Result<Plan, PlanError> {
    debug!(response_len = response.len(), "parse_response: called");
    match decode(response) {
        Decoded::Json(value) => validate(value),
        Decoded::NoJson => {
            debug!("parse_response: no JSON object found, wrapping raw text");
            Ok(Plan::from_raw_text(response, NO_JSON_WARNING))
        }
        Decoded::Malformed(reason) => {
            warn!(%reason, "parse_response: JSON parse error");
            Ok(Plan::from_raw_text(response, MALFORMED_JSON_WARNING))
        }
    }
}

fn decode(response: &str) -> Decoded {
    let trimmed = response.trim();
    if trimmed.starts_with('{') {
        return decode_json(trimmed);
    }

    match extract_json_block(response) {
        Some(slice) => decode_json(slice),
        // An opening brace with no closing one after it is a broken object
        None if response.contains('{') => Decoded::Malformed("no closing '}' after '{'".to_string()),
        None => Decoded::NoJson,
    }
}

fn decode_json(text: &str) -> Decoded {
    match serde_json::from_str(text) {
        Ok(value) => Decoded::Json(value),
        Err(e) => Decoded::Malformed(e.to_string()),
    }
}

/// Span from the first `{` to the last `}` inclusive
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start { Some(&text[start..=end]) } else { None }
}

/// Check the required shape, then deserialize into a typed plan
pub fn validate(value: Value) -> Result<Plan, PlanError> {
    let steps = value.get("plan").and_then(Value::as_array).ok_or(PlanError::MissingSteps)?;

    for (index, step) in steps.iter().enumerate() {
        let complete = step
            .as_object()
            .is_some_and(|obj| REQUIRED_STEP_FIELDS.iter().all(|key| obj.contains_key(*key)));
        if !complete {
            debug!(index, "validate: step missing required fields");
            return Err(PlanError::IncompleteStep { index });
        }
    }

    let plan: Plan = serde_json::from_value(value).map_err(PlanError::Schema)?;
    debug!(step_count = plan.len(), "validate: plan accepted");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EXECUTE_USER_REQUEST, StepCategory};

    const NGINX: &str = r#"{
        "plan": [
            {"step": 1, "description": "Update package manager", "task": "Refresh package lists", "category": "update"},
            {"step": 2, "description": "Install nginx", "task": "Install the nginx package", "category": "install"},
            {"step": 3, "description": "Start nginx", "task": "Start and enable nginx", "category": "start"}
        ],
        "summary": "Install nginx web server and start the service",
        "estimated_time": "2-3 minutes",
        "requires_sudo": true,
        "warnings": ["Nginx will be accessible on port 80"]
    }"#;

    #[test]
    fn test_parse_direct_json() {
        let plan = parse_response(NGINX).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.steps[1].category, StepCategory::Install);
        assert_eq!(plan.estimated_time, "2-3 minutes");
        assert!(plan.requires_sudo);
        assert_eq!(plan.warnings.len(), 1);
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let response = format!("Sure! Here is the plan:\n```json\n{}\n```\nLet me know.", NGINX);
        let plan = parse_response(&response).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.summary, "Install nginx web server and start the service");
    }

    #[test]
    fn test_parse_plain_text_wraps_raw() {
        let plan = parse_response("  Just run `ps aux` to see processes.  ").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps[0].task, "Just run `ps aux` to see processes.");
        assert_eq!(plan.steps[0].description, EXECUTE_USER_REQUEST);
        assert_eq!(plan.steps[0].category, StepCategory::Other);
        assert_eq!(plan.warnings, vec![NO_JSON_WARNING]);
    }

    #[test]
    fn test_parse_malformed_direct_json() {
        let plan = parse_response("{\"plan\": [ oops").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps[0].task, "{\"plan\": [ oops");
        assert_eq!(plan.warnings, vec![MALFORMED_JSON_WARNING]);
    }

    #[test]
    fn test_parse_malformed_embedded_json() {
        let plan = parse_response("Plan: {not json} done").unwrap();
        assert_eq!(plan.warnings, vec![MALFORMED_JSON_WARNING]);
        assert_eq!(plan.steps[0].task, "Plan: {not json} done");
    }

    #[test]
    fn test_direct_json_with_trailing_text_is_malformed() {
        let plan = parse_response("{\"plan\": []} and that's it").unwrap();
        assert_eq!(plan.warnings, vec![MALFORMED_JSON_WARNING]);
    }

    #[test]
    fn test_reversed_braces_is_malformed() {
        let plan = parse_response("close } before open {").unwrap();
        assert_eq!(plan.warnings, vec![MALFORMED_JSON_WARNING]);
    }

    #[test]
    fn test_unclosed_embedded_json_is_malformed() {
        let plan = parse_response("Here is the plan: {\"plan\": [").unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps[0].task, "Here is the plan: {\"plan\": [");
        assert_eq!(plan.warnings, vec![MALFORMED_JSON_WARNING]);
    }

    #[test]
    fn test_closing_brace_only_is_no_json() {
        let plan = parse_response("done } that's all").unwrap();
        assert_eq!(plan.warnings, vec![NO_JSON_WARNING]);
    }

    #[test]
    fn test_null_optional_fields_accepted() {
        let plan = parse_response(
            r#"{"plan": [{"step": 1, "description": "Check disk", "task": "Show disk usage", "category": "check"}],
                "summary": "Disk usage", "estimated_time": null, "warnings": null}"#,
        )
        .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.estimated_time, "");
        assert!(plan.warnings.is_empty());
    }

    #[test]
    fn test_string_step_number_accepted() {
        let plan = parse_response(
            r#"{"plan": [{"step": "1", "description": "Check disk", "task": "Show disk usage", "category": "check"}]}"#,
        )
        .unwrap();
        assert_eq!(plan.steps[0].step, 1);
    }

    #[test]
    fn test_missing_plan_list_rejected() {
        let err = parse_response(r#"{"summary": "nothing"}"#).unwrap_err();
        assert!(matches!(err, PlanError::MissingSteps));
        assert_eq!(err.to_string(), "Plan must contain a list of steps");

        let err = parse_response(r#"{"plan": "step one"}"#).unwrap_err();
        assert!(matches!(err, PlanError::MissingSteps));
    }

    #[test]
    fn test_step_missing_field_rejected() {
        let err = parse_response(r#"{"plan": [{"step": 1, "description": "x", "task": "y"}]}"#).unwrap_err();
        assert!(matches!(err, PlanError::IncompleteStep { index: 0 }));
        assert_eq!(
            err.to_string(),
            "Each step must have step, description, task, and category fields"
        );
    }

    #[test]
    fn test_non_object_step_rejected() {
        let err = parse_response(r#"{"plan": ["install nginx"]}"#).unwrap_err();
        assert!(matches!(err, PlanError::IncompleteStep { index: 0 }));
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let err = parse_response(
            r#"{"plan": [{"step": "first", "description": "x", "task": "y", "category": "check"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::Schema(_)));
    }

    #[test]
    fn test_empty_plan_list_accepted() {
        let plan = parse_response(r#"{"plan": [], "summary": "Nothing to do"}"#).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.summary, "Nothing to do");
    }

    #[test]
    fn test_extract_json_block() {
        assert_eq!(extract_json_block("a {\"x\": 1} b"), Some("{\"x\": 1}"));
        assert_eq!(extract_json_block("{a} {b}"), Some("{a} {b}"));
        assert_eq!(extract_json_block("no json"), None);
        // No span, though decode still treats the lone brace as broken JSON
        assert_eq!(extract_json_block("only {"), None);
        assert_eq!(extract_json_block("} then {"), None);
    }
}
