//! System directive templates
//!
//! The study assistant directive is built in; a persona TOML file can
//! replace it.
//!
//! # Example Persona File
//!
//! ```toml
//! [persona]
//! name = "Exam Coach"
//! description = "Drills the user before an exam"
//!
//! [system_prompt]
//! content = """
//! You are an exam coach...
//! """
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// A persona/prompt template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    /// Persona metadata
    pub persona: PersonaInfo,

    /// The system prompt
    pub system_prompt: SystemPrompt,
}

/// Persona metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaInfo {
    /// Display name of the persona
    pub name: String,

    /// Brief description
    #[serde(default)]
    pub description: String,
}

/// System prompt content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemPrompt {
    /// The full system prompt content
    pub content: String,
}

impl PromptTemplate {
    /// Load a template from a TOML file
    pub async fn load_from_file(path: &Path) -> Result<Self, PromptError> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PromptError::IoError(e.to_string()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, PromptError> {
        let template: PromptTemplate =
            toml::from_str(content).map_err(|e| PromptError::ParseError(e.to_string()))?;

        if template.system_prompt.content.trim().is_empty() {
            return Err(PromptError::ParseError(format!(
                "persona '{}' has an empty system prompt",
                template.persona.name
            )));
        }
        Ok(template)
    }
}

/// Errors from prompt loading
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Built-in prompts that don't require files
pub mod builtin {
    /// Default study assistant directive
    pub const STUDY_ASSISTANT: &str = "You are a smart and friendly study assistant designed to help users learn more effectively. \
You help users by creating mind maps, summarizing notes, and providing useful, personalized study insights. \
Before giving advice or generating study materials, ask at least 3 clarifying questions\u{2014}one at a time\u{2014}about the topic, the user\u{2019}s goals, and their preferred study style. \
Each question can build on the previous one or explore related areas of the topic. \
Once you have enough information, offer organized, helpful study content based on their answers.";

    /// Prefix of the final user turn of every chat request
    pub const CONTEXT_PREFIX: &str = "Study context: ";

    /// Reply recorded when the completion provider fails
    pub const ERROR_REPLY: &str = "Error: Unable to get a response from the chatbot.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template() {
        let toml_content = r#"
[persona]
name = "Exam Coach"
description = "Drills the user"

[system_prompt]
content = "You are an exam coach."
"#;

        let template = PromptTemplate::parse(toml_content).unwrap();
        assert_eq!(template.persona.name, "Exam Coach");
        assert_eq!(template.system_prompt.content, "You are an exam coach.");
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let toml_content = r#"
[persona]
name = "Blank"

[system_prompt]
content = "   "
"#;

        let err = PromptTemplate::parse(toml_content).unwrap_err();
        assert!(err.to_string().contains("Blank"));
    }

    #[test]
    fn test_missing_file() {
        let err = tokio_test::block_on(PromptTemplate::load_from_file(Path::new(
            "/nonexistent/persona.toml",
        )))
        .unwrap_err();
        assert!(matches!(err, PromptError::IoError(_)));
    }

    #[test]
    fn test_builtin_directive() {
        assert!(builtin::STUDY_ASSISTANT.starts_with("You are a smart and friendly study assistant"));
        assert!(builtin::STUDY_ASSISTANT.contains("at least 3 clarifying questions"));
    }
}
