//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::StepCategory;

/// Context for rendering the planner prompt
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Pipe-separated step categories the model may use
    pub categories: String,
}

impl Default for PromptContext {
    fn default() -> Self {
        Self {
            categories: StepCategory::prompt_list(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Explicit template file (from config `prompt-path`)
    override_path: Option<PathBuf>,
    /// User override directory (e.g., `.aish/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader rooted at `base`
    ///
    /// `base/.aish/prompts/{name}.pmt` overrides the embedded template when present.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let user_dir = base.as_ref().join(".aish/prompts");
        let user_dir_exists = user_dir.exists();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            override_path: None,
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            override_path: None,
            user_dir: None,
        }
    }

    /// Use `path` for every template lookup before anything else
    pub fn with_override(mut self, path: Option<PathBuf>) -> Self {
        debug!(?path, "PromptLoader::with_override: called");
        self.override_path = path;
        self
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Explicit override path
    /// 2. User override: `.aish/prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref path) = self.override_path {
            return std::fs::read_to_string(path)
                .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
        }

        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}'", template_name);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the planner system prompt
    pub fn planner_prompt(&self) -> Result<String> {
        debug!("PromptLoader::planner_prompt: called");
        self.render("planner", &PromptContext::default())
    }
}
