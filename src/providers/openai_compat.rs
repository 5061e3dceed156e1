//! OpenAI-compatible provider
//!
//! Works with any API that implements the OpenAI chat completions format:
//! - OpenRouter (openrouter.ai), the default
//! - OpenAI (api.openai.com)
//! - vLLM, LM Studio and other local servers
//!
//! # Configuration
//!
//! ```toml
//! [llm]
//! provider = "openrouter"
//! api_key_env = "OPENROUTER_API_KEY"
//! model = "deepseek/deepseek-chat"
//! ```

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{ProviderError, Turn};

/// OpenAI-compatible chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    fn new(turns: &[Turn], model: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: turns.iter().map(ChatMessage::from).collect(),
        }
    }
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

/// Error response from API
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone)]
pub struct OpenAICompatConfig {
    /// Base URL for the API (e.g., https://openrouter.ai/api/v1)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAICompatConfig {
    fn default() -> Self {
        Self::openrouter(None)
    }
}

impl OpenAICompatConfig {
    /// Create config for OpenRouter
    pub fn openrouter(api_key: Option<String>) -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key,
            timeout_secs: 120,
        }
    }

    /// Create config for OpenAI
    pub fn openai(api_key: Option<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key,
            timeout_secs: 120,
        }
    }
}

/// OpenAI-compatible API provider
pub struct OpenAICompatProvider {
    config: OpenAICompatConfig,
    client: Client,
}

impl OpenAICompatProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: OpenAICompatConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Send a chat completion request and return the reply text
    pub async fn chat(&self, turns: &[Turn], model: &str) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.config.base_url);

        let request = ChatCompletionRequest::new(turns, model);

        let mut req_builder = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&body) {
                return Err(ProviderError::InvalidResponse(format!(
                    "API error: {}",
                    error_resp.error.message
                )));
            }
            return Err(ProviderError::InvalidResponse(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        parse_completion(&body)
    }
}

fn parse_completion(body: &str) -> Result<String, ProviderError> {
    let completion: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!("Failed to parse response: {} - Body: {}", e, body))
    })?;

    if let Some(usage) = &completion.usage {
        tracing::debug!(total_tokens = usage.total_tokens, "Completion usage");
    }

    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

    choice
        .message
        .content
        .ok_or_else(|| ProviderError::InvalidResponse("Empty message content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::TurnRole;

    #[test]
    fn test_config_presets() {
        let openrouter = OpenAICompatConfig::openrouter(Some("test-key".to_string()));
        assert!(openrouter.base_url.contains("openrouter.ai"));
        assert_eq!(openrouter.api_key, Some("test-key".to_string()));
        assert_eq!(openrouter.timeout_secs, 120);

        let openai = OpenAICompatConfig::openai(None);
        assert!(openai.base_url.contains("openai.com"));
        assert!(openai.api_key.is_none());
    }

    #[test]
    fn test_message_conversion() {
        let turn = Turn {
            role: TurnRole::System,
            content: "Be helpful".to_string(),
        };
        let chat_msg = ChatMessage::from(&turn);
        assert_eq!(chat_msg.role, "system");
        assert_eq!(chat_msg.content, "Be helpful");
    }

    #[test]
    fn test_request_carries_configured_model() {
        let turns = [Turn::system("Be helpful"), Turn::user("Study context: cells")];
        let request = ChatCompletionRequest::new(&turns, "meta-llama/llama-3.1-8b-instruct");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "meta-llama/llama-3.1-8b-instruct");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Study context: cells");
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Which chapter?"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        assert_eq!(parse_completion(body).unwrap(), "Which chapter?");
    }

    #[test]
    fn test_parse_completion_malformed() {
        let err = parse_completion(r#"{"choices": []}"#).unwrap_err();
        assert!(err.to_string().contains("No choices"));

        let err = parse_completion("not json").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
