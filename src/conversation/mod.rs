//! Conversation types and state management

mod registry;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use registry::ConversationRegistry;

/// Who produced a message in a thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: Role,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Role::User,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Role::Assistant,
        }
    }
}

/// Display name of a conversation, e.g. `Conversation 3`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub(crate) fn numbered(n: u64) -> Self {
        Self(format!("Conversation {}", n))
    }
}

impl From<&str> for ConversationId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only log of turns belonging to one conversation
#[derive(Debug, Clone, Serialize)]
pub struct MessageThread {
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl MessageThread {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn push_user(&mut self, text: &str) {
        self.messages.push(Message::user(text));
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.messages.push(Message::assistant(text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for MessageThread {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_appends_in_order() {
        let mut thread = MessageThread::new();
        assert!(thread.messages().is_empty());

        thread.push_user("What is osmosis?");
        thread.push_assistant("Which course is this for?");

        assert_eq!(thread.len(), 2);
        assert_eq!(thread.messages()[0], Message::user("What is osmosis?"));
        assert_eq!(thread.messages()[1].sender, Role::Assistant);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"text":"hi","sender":"assistant"}"#);
    }

    #[test]
    fn test_conversation_id_display() {
        let id = ConversationId::numbered(7);
        assert_eq!(id.to_string(), "Conversation 7");
        assert_eq!(id, ConversationId::from("Conversation 7"));
    }
}
