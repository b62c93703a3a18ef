//! Human-readable plan rendering for the terminal

use colored::Colorize;

use crate::domain::{Plan, StepCategory};

/// Render a plan as colored text
pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", plan.summary.bold()));
    out.push_str(&format!("Estimated time: {}\n", plan.estimated_time));
    if plan.requires_sudo {
        out.push_str(&format!("{}\n", "Requires sudo".yellow()));
    }
    out.push('\n');

    if plan.is_empty() {
        out.push_str("  (no steps)\n");
    }
    for step in &plan.steps {
        out.push_str(&format!(
            "  {:>2}. [{}] {}\n",
            step.step,
            category_label(step.category),
            step.description
        ));
        out.push_str(&format!("      {}\n", step.task.dimmed()));
    }

    if !plan.warnings.is_empty() {
        out.push('\n');
        for warning in &plan.warnings {
            out.push_str(&format!("{} {}\n", "warning:".yellow().bold(), warning));
        }
    }

    out
}

fn category_label(category: StepCategory) -> colored::ColoredString {
    let label = category.as_str();
    match category {
        StepCategory::Delete | StepCategory::Stop => label.red(),
        StepCategory::Install | StepCategory::Update => label.blue(),
        StepCategory::Start | StepCategory::Create => label.green(),
        StepCategory::Check => label.cyan(),
        StepCategory::Configure | StepCategory::Other => label.normal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Step;

    #[test]
    fn test_render_plan_lists_steps() {
        colored::control::set_override(false);
        let plan = Plan {
            steps: vec![
                Step::new(1, "Install nginx", "Install the nginx package", StepCategory::Install),
                Step::new(2, "Start nginx", "Start the service", StepCategory::Start),
            ],
            summary: "Install and start nginx".to_string(),
            estimated_time: "2-3 minutes".to_string(),
            requires_sudo: true,
            warnings: vec!["Port 80 will be opened".to_string()],
        };

        let text = render_plan(&plan);
        assert!(text.contains("Install and start nginx"));
        assert!(text.contains(" 1. [install] Install nginx"));
        assert!(text.contains(" 2. [start] Start nginx"));
        assert!(text.contains("Requires sudo"));
        assert!(text.contains("warning: Port 80 will be opened"));
    }

    #[test]
    fn test_render_empty_plan() {
        colored::control::set_override(false);
        let text = render_plan(&Plan::no_input());
        assert!(text.contains("(no steps)"));
        assert!(text.contains("No user input provided"));
    }
}
