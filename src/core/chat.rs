//! Chat orchestration
//!
//! The ChatOrchestrator handles one utterance at a time:
//! 1. Appends the user turn to the active conversation straight away
//! 2. Builds a request from the system directive and the thread history
//! 3. Awaits the completion provider without holding the registry lock
//! 4. Appends the reply, or a fixed error turn, to the conversation the
//!    utterance was sent to

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::{prompts_builtin, Config};
use crate::conversation::{ConversationId, ConversationRegistry, Message};
use crate::providers::{CompletionProvider, Turn};

/// What happened to an utterance handed to [`ChatOrchestrator::send`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SendOutcome {
    /// Blank input, nothing was sent
    Ignored,
    Completed {
        conversation: ConversationId,
        reply: String,
    },
    Failed {
        conversation: ConversationId,
        reply: String,
    },
}

pub struct ChatOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    system_directive: String,
    context_prefix: String,
}

impl ChatOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            system_directive: prompts_builtin::STUDY_ASSISTANT.to_string(),
            context_prefix: prompts_builtin::CONTEXT_PREFIX.to_string(),
        }
    }

    /// Orchestrator using the model and framing from `config`
    pub fn from_config(
        provider: Arc<dyn CompletionProvider>,
        config: &Config,
        system_directive: String,
    ) -> Self {
        Self::new(provider, config.study.llm.model.clone())
            .with_system_directive(system_directive)
            .with_context_prefix(config.study.chat.context_prefix.clone())
    }

    pub fn with_system_directive(mut self, directive: impl Into<String>) -> Self {
        self.system_directive = directive.into();
        self
    }

    pub fn with_context_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.context_prefix = prefix.into();
        self
    }

    /// Build the request for `input` given the turns already in the thread
    pub fn build_request(&self, history: &[Message], input: &str) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(Turn::system(self.system_directive.as_str()));
        turns.extend(history.iter().map(Turn::from));
        turns.push(Turn::user(format!("{}{}", self.context_prefix, input)));
        turns
    }

    /// Send `input` on behalf of the active conversation.
    ///
    /// Starts a conversation first when none is active. The reply is written
    /// to the conversation that was active when the utterance was sent, even
    /// if another one has been selected since.
    pub async fn send(&self, registry: &Mutex<ConversationRegistry>, input: &str) -> SendOutcome {
        if input.trim().is_empty() {
            return SendOutcome::Ignored;
        }

        let (target, turns) = {
            let mut registry = registry.lock().await;
            let target = registry.ensure_active();

            let history = registry
                .thread(&target)
                .map(|thread| thread.messages())
                .unwrap_or(&[]);
            let turns = self.build_request(history, input);

            if let Some(thread) = registry.thread_mut(&target) {
                thread.push_user(input);
            }
            registry.clear_draft();
            (target, turns)
        };

        tracing::debug!(conversation = %target, turns = turns.len(), "Sending chat request");

        match self.provider.complete(&turns, &self.model).await {
            Ok(reply) => {
                self.record_reply(registry, &target, &reply).await;
                SendOutcome::Completed {
                    conversation: target,
                    reply,
                }
            }
            Err(e) => {
                tracing::error!(conversation = %target, error = %e, "Completion request failed");
                let reply = prompts_builtin::ERROR_REPLY.to_string();
                self.record_reply(registry, &target, &reply).await;
                SendOutcome::Failed {
                    conversation: target,
                    reply,
                }
            }
        }
    }

    async fn record_reply(
        &self,
        registry: &Mutex<ConversationRegistry>,
        target: &ConversationId,
        reply: &str,
    ) {
        let mut registry = registry.lock().await;
        match registry.thread_mut(target) {
            Some(thread) => thread.push_assistant(reply),
            None => tracing::warn!(conversation = %target, "Dropping reply for missing conversation"),
        }
    }
}
