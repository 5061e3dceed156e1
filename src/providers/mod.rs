//! Completion provider integrations

mod ollama;
mod openai_compat;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::conversation::{Message, Role};

pub use ollama::OllamaProvider;
pub use openai_compat::{OpenAICompatConfig, OpenAICompatProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Role of a turn sent to a completion model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnRole::System => "system",
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One entry of a completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }
}

impl From<&Message> for Turn {
    fn from(msg: &Message) -> Self {
        Self {
            role: match msg.sender {
                Role::User => TurnRole::User,
                Role::Assistant => TurnRole::Assistant,
            },
            content: msg.text.clone(),
        }
    }
}

/// A remote model that answers an ordered list of turns with one reply
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, turns: &[Turn], model: &str) -> Result<String, ProviderError>;
}

pub enum Provider {
    OpenAICompat(OpenAICompatProvider),
    Ollama(OllamaProvider),
}

impl Provider {
    /// Build the provider named in the `[llm]` section of the configuration
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let llm = &config.study.llm;

        match llm.provider.to_lowercase().as_str() {
            "openrouter" => {
                let mut settings = OpenAICompatConfig::openrouter(config.llm_api_key.clone());
                apply_overrides(&mut settings, llm.endpoint.as_deref(), llm.timeout_secs);
                Ok(Provider::OpenAICompat(OpenAICompatProvider::new(settings)?))
            }
            "openai" => {
                let mut settings = OpenAICompatConfig::openai(config.llm_api_key.clone());
                apply_overrides(&mut settings, llm.endpoint.as_deref(), llm.timeout_secs);
                Ok(Provider::OpenAICompat(OpenAICompatProvider::new(settings)?))
            }
            "ollama" => {
                let url = llm
                    .endpoint
                    .clone()
                    .or_else(|| config.ollama_url.clone())
                    .unwrap_or_else(|| "http://localhost:11434".into());
                Ok(Provider::Ollama(OllamaProvider::new(url, llm.timeout_secs)?))
            }
            _ => Err(ProviderError::UnknownProvider(llm.provider.clone())),
        }
    }
}

fn apply_overrides(settings: &mut OpenAICompatConfig, endpoint: Option<&str>, timeout_secs: u64) {
    if let Some(endpoint) = endpoint {
        settings.base_url = endpoint.trim_end_matches('/').to_string();
    }
    settings.timeout_secs = timeout_secs;
}

#[async_trait]
impl CompletionProvider for Provider {
    async fn complete(&self, turns: &[Turn], model: &str) -> Result<String, ProviderError> {
        match self {
            Provider::OpenAICompat(p) => p.chat(turns, model).await,
            Provider::Ollama(p) => p.chat(turns, model).await,
        }
    }
}
