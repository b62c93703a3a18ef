//! aish configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default base URL for a local Ollama server
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default model when the provider is Ollama
pub const OLLAMA_MODEL: &str = "llama3.2";

/// Provider names accepted in `llm.provider`
pub const SUPPORTED_PROVIDERS: [&str; 2] = ["openai", "ollama"];

/// Main aish configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Log prompts, raw responses and parse failures
    pub debug: bool,

    /// Override for the planner system prompt template
    #[serde(rename = "prompt-path")]
    pub prompt_path: Option<PathBuf>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Fails fast when a hosted provider is selected but its key is missing.
    pub fn validate(&self) -> Result<()> {
        debug!(provider = %self.llm.provider, "Config::validate: called");
        if !SUPPORTED_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(eyre::eyre!(
                "Unknown LLM provider: '{}'. Supported: {}",
                self.llm.provider,
                SUPPORTED_PROVIDERS.join(", ")
            ));
        }
        if self.llm.requires_api_key() {
            self.llm.get_api_key()?;
        }
        Ok(())
    }

    /// Load configuration with fallback chain, then apply env overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_files(config_path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::candidate_paths(config_path)
            .into_iter()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn load_files(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths(None) {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Project-local `.aish.yml`, then `~/.config/aish/aish.yml`
    fn candidate_paths(config_path: Option<&PathBuf>) -> Vec<PathBuf> {
        if let Some(path) = config_path {
            return vec![path.clone()];
        }

        let mut paths = vec![PathBuf::from(".aish.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("aish").join("aish.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.llm.apply_provider_defaults();

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply `AISH_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("AISH_LLM_PROVIDER") {
            debug!(%provider, "apply_env_overrides: provider");
            self.llm.provider = provider.trim().to_lowercase();
            self.llm.apply_provider_defaults();
        }
        if let Ok(model) = std::env::var("AISH_LLM_MODEL") {
            debug!(%model, "apply_env_overrides: model");
            self.llm.model = model;
        }
        if let Ok(base_url) = std::env::var("AISH_LLM_BASE_URL") {
            debug!(%base_url, "apply_env_overrides: base url");
            self.llm.base_url = base_url;
        }
        if let Ok(flag) = std::env::var("AISH_DEBUG") {
            self.debug = matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on");
            debug!(debug = self.debug, "apply_env_overrides: debug");
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.1,
            max_tokens: 2048,
            timeout_ms: 30_000,
        }
    }
}

impl LlmConfig {
    /// Defaults for a local Ollama server
    pub fn ollama() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: OLLAMA_MODEL.to_string(),
            api_key_env: String::new(),
            base_url: OLLAMA_BASE_URL.to_string(),
            ..Self::default()
        }
    }

    /// Hosted providers need a key, local ones do not
    pub fn requires_api_key(&self) -> bool {
        self.provider != "ollama"
    }

    /// Replace OpenAI defaults left in place when the provider is Ollama
    ///
    /// Fields the user set explicitly are kept.
    pub fn apply_provider_defaults(&mut self) {
        if self.provider != "ollama" {
            return;
        }
        let openai = Self::default();
        if self.base_url == openai.base_url {
            self.base_url = OLLAMA_BASE_URL.to_string();
        }
        if self.model == openai.model {
            self.model = OLLAMA_MODEL.to_string();
        }
        if self.api_key_env == openai.api_key_env {
            self.api_key_env = String::new();
        }
    }

    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(api_key_env = %self.api_key_env, "get_api_key: called");
        std::env::var(&self.api_key_env).context(format!(
            "LLM API key not found. Set the {} environment variable.",
            self.api_key_env
        ))
    }

    /// Base URL with any trailing slash removed
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
