//! Application configuration

pub mod prompts;
pub mod study;

use std::env;
use std::path::PathBuf;

pub use prompts::{builtin as prompts_builtin, PromptTemplate};
pub use study::StudyConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Key read from the variable named by `llm.api_key_env`
    pub llm_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub study: StudyConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let study = match env::var("STUDYSYNC_CONFIG") {
            Ok(path) => {
                let path = PathBuf::from(path);
                tracing::info!("Loading study config from {}", path.display());
                StudyConfig::from_file(&path)?
            }
            Err(_) => StudyConfig::default(),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4040),
            llm_api_key: env::var(&study.llm.api_key_env).ok(),
            ollama_url: env::var("OLLAMA_URL").ok(),
            study,
        })
    }

    /// System directive: the persona file when configured, else the built-in one
    pub async fn system_directive(&self) -> Result<String, prompts::PromptError> {
        match &self.study.chat.persona_file {
            Some(path) => {
                let template = PromptTemplate::load_from_file(path).await?;
                tracing::info!(persona = %template.persona.name, "Using persona directive");
                Ok(template.system_prompt.content)
            }
            None => Ok(prompts_builtin::STUDY_ASSISTANT.to_string()),
        }
    }
}
