//! Registry of named conversation threads
//!
//! Tracks creation order, the active conversation and the in-progress draft.
//! Replies are routed by explicit [`ConversationId`] so a switch while a
//! request is in flight cannot misroute them.

use std::collections::HashMap;

use super::{ConversationId, Message, MessageThread};

#[derive(Debug, Default)]
pub struct ConversationRegistry {
    order: Vec<ConversationId>,
    threads: HashMap<ConversationId, MessageThread>,
    active: Option<ConversationId>,
    counter: u64,
    draft: String,
}

impl ConversationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new, empty conversation and make it active
    pub fn create_conversation(&mut self) -> ConversationId {
        self.counter += 1;
        let id = ConversationId::numbered(self.counter);

        self.order.push(id.clone());
        self.threads.insert(id.clone(), MessageThread::new());
        self.active = Some(id.clone());
        self.draft.clear();

        tracing::debug!(conversation = %id, "Created conversation");
        id
    }

    /// Make `id` the active conversation. Unknown ids are ignored.
    pub fn select_conversation(&mut self, id: &ConversationId) -> bool {
        if !self.threads.contains_key(id) {
            tracing::debug!(conversation = %id, "Ignoring selection of unknown conversation");
            return false;
        }
        self.active = Some(id.clone());
        true
    }

    pub fn list_conversations(&self) -> &[ConversationId] {
        &self.order
    }

    pub fn active(&self) -> Option<&ConversationId> {
        self.active.as_ref()
    }

    /// Messages of the active conversation, empty when none is active
    pub fn active_messages(&self) -> &[Message] {
        self.active
            .as_ref()
            .and_then(|id| self.threads.get(id))
            .map(MessageThread::messages)
            .unwrap_or(&[])
    }

    pub fn thread(&self, id: &ConversationId) -> Option<&MessageThread> {
        self.threads.get(id)
    }

    pub(crate) fn thread_mut(&mut self, id: &ConversationId) -> Option<&mut MessageThread> {
        self.threads.get_mut(id)
    }

    /// Active conversation, creating one first if none exists yet
    pub(crate) fn ensure_active(&mut self) -> ConversationId {
        match self.active.clone() {
            Some(id) => id,
            None => self.create_conversation(),
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub(crate) fn clear_draft(&mut self) {
        self.draft.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ConversationRegistry::new();
        assert!(registry.list_conversations().is_empty());
        assert!(registry.active().is_none());
        assert!(registry.active_messages().is_empty());
    }

    #[test]
    fn test_names_are_sequential() {
        let mut registry = ConversationRegistry::new();

        let first = registry.create_conversation();
        registry.thread_mut(&first).unwrap().push_user("hello");
        registry.thread_mut(&first).unwrap().push_assistant("hi");
        let second = registry.create_conversation();
        let third = registry.create_conversation();

        assert_eq!(first.to_string(), "Conversation 1");
        assert_eq!(second.to_string(), "Conversation 2");
        assert_eq!(third.to_string(), "Conversation 3");
        assert_eq!(registry.list_conversations(), &[first, second, third.clone()]);
        assert_eq!(registry.active(), Some(&third));
    }

    #[test]
    fn test_create_clears_draft_and_keeps_previous() {
        let mut registry = ConversationRegistry::new();
        let first = registry.create_conversation();
        registry.thread_mut(&first).unwrap().push_user("keep me");
        registry.set_draft("half-typed");

        registry.create_conversation();

        assert_eq!(registry.draft(), "");
        assert!(registry.active_messages().is_empty());
        assert_eq!(registry.thread(&first).unwrap().len(), 1);
    }

    #[test]
    fn test_select_loads_thread() {
        let mut registry = ConversationRegistry::new();
        let first = registry.create_conversation();
        registry.thread_mut(&first).unwrap().push_user("cell biology");
        registry.create_conversation();

        assert!(registry.select_conversation(&first));
        assert_eq!(registry.active(), Some(&first));
        assert_eq!(registry.active_messages(), &[Message::user("cell biology")]);
    }

    #[test]
    fn test_select_unknown_is_noop() {
        let mut registry = ConversationRegistry::new();
        let first = registry.create_conversation();
        registry.thread_mut(&first).unwrap().push_user("stay");

        let before = registry.active_messages().to_vec();
        assert!(!registry.select_conversation(&ConversationId::from("Conversation 42")));

        assert_eq!(registry.active(), Some(&first));
        assert_eq!(registry.active_messages(), before.as_slice());
    }

    #[test]
    fn test_ensure_active_creates_once() {
        let mut registry = ConversationRegistry::new();
        let id = registry.ensure_active();
        assert_eq!(registry.ensure_active(), id);
        assert_eq!(registry.list_conversations().len(), 1);
    }
}
