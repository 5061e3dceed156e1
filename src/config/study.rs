//! Study session configuration loaded from TOML files
//!
//! Defines which completion provider answers chat turns and how the chat
//! request is framed:
//! - LLM provider, model and endpoint
//! - Persona file overriding the built-in study assistant directive
//! - Prefix wrapped around each new utterance

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::prompts::builtin;

/// Root study configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyConfig {
    /// LLM provider settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Chat request framing
    #[serde(default)]
    pub chat: ChatConfig,
}

impl StudyConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: StudyConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Validation("llm.model must not be empty".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::Validation("llm.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider name: "openrouter", "openai", "ollama"
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// API key environment variable name (for cloud providers)
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Custom API endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "openrouter".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-chat".to_string()
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Chat request framing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Persona template replacing the built-in system directive
    #[serde(default)]
    pub persona_file: Option<PathBuf>,

    /// Text put in front of each new utterance in the final request turn
    #[serde(default = "default_context_prefix")]
    pub context_prefix: String,
}

fn default_context_prefix() -> String {
    builtin::CONTEXT_PREFIX.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            persona_file: None,
            context_prefix: default_context_prefix(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
