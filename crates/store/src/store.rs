use crate::model::{
    Conversation, ConversationId, Message, MessageId, ReplySessionId, ReplyTarget, Role,
};
use crate::reply::{CANNED_REPLY, DEFAULT_GREETING, ReplySchedule};

/// Default name for a conversation created without one.
pub fn default_conversation_name(id: ConversationId) -> String {
    format!("New Chat {}", id.0)
}

/// Owns every conversation and message for the process lifetime.
///
/// All operations are total: blank input is defaulted or retained, unknown
/// ids are absorbed as no-ops, and a reply delivery whose conversation has
/// been deleted does nothing. The store performs no I/O and schedules no
/// timers itself; submit only records the captured [`ReplyTarget`] and the
/// caller decides when delivery happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active: Option<ConversationId>,
    next_conversation_id: u64,
    next_message_id: u64,
    next_reply_session_id: u64,
    replies: ReplySchedule,
    greeting: String,
    canned_reply: String,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::with_texts(DEFAULT_GREETING, CANNED_REPLY)
    }

    /// Creates a store with configured greeting and canned-reply texts.
    pub fn with_texts(greeting: impl Into<String>, canned_reply: impl Into<String>) -> Self {
        Self {
            conversations: Vec::new(),
            active: None,
            next_conversation_id: 1,
            next_message_id: 1,
            next_reply_session_id: 1,
            replies: ReplySchedule::new(),
            greeting: greeting.into(),
            canned_reply: canned_reply.into(),
        }
    }

    /// Conversations in creation order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Active selection; `None` exactly when the store is empty.
    pub fn active_id(&self) -> Option<ConversationId> {
        self.active
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.active.and_then(|id| self.conversation(id))
    }

    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations
            .iter()
            .find(|conversation| conversation.id == id)
    }

    pub fn pending_reply_count(&self) -> usize {
        self.replies.pending_count()
    }

    /// Total number of messages across all conversations.
    pub fn message_count(&self) -> usize {
        self.conversations
            .iter()
            .map(|conversation| conversation.messages.len())
            .sum()
    }

    /// Creates a conversation, seeds the assistant greeting, and makes it
    /// the active selection.
    ///
    /// A blank or missing name falls back to [`default_conversation_name`].
    pub fn create(&mut self, name: Option<&str>) -> ConversationId {
        let id = ConversationId::new(self.next_conversation_id);
        self.next_conversation_id = self.next_conversation_id.saturating_add(1);

        let name = match name.map(str::trim) {
            Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
            _ => default_conversation_name(id),
        };

        let mut conversation = Conversation::new(id, name);
        let greeting = Message::new(self.alloc_message_id(), Role::Assistant, &self.greeting);
        conversation.messages.push(greeting);

        self.conversations.push(conversation);
        self.active = Some(id);
        id
    }

    /// Renames a conversation; a blank name retains the current one and an
    /// unknown id is a no-op.
    pub fn rename(&mut self, id: ConversationId, new_name: &str) {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return;
        }

        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == id)
        else {
            tracing::debug!(conversation_id = id.0, "ignoring rename of unknown conversation");
            return;
        };

        conversation.name = trimmed.to_string();
    }

    /// Deletes a conversation, cancelling its undelivered replies.
    ///
    /// Returns the cancelled reply sessions so the caller can drop their
    /// timer tasks. If the deleted conversation was active, selection falls
    /// back to the first remaining conversation in creation order, or to
    /// `None` when the store empties.
    pub fn delete(&mut self, id: ConversationId) -> Vec<ReplySessionId> {
        let before = self.conversations.len();
        self.conversations.retain(|conversation| conversation.id != id);
        if self.conversations.len() == before {
            tracing::debug!(conversation_id = id.0, "ignoring delete of unknown conversation");
            return Vec::new();
        }

        if self.active == Some(id) {
            self.active = self.conversations.first().map(|conversation| conversation.id);
        }

        self.replies.cancel_conversation(id)
    }

    /// Sets the active selection; an unknown id is a no-op.
    pub fn select(&mut self, id: ConversationId) {
        if self.conversation(id).is_none() {
            tracing::debug!(conversation_id = id.0, "ignoring select of unknown conversation");
            return;
        }

        self.active = Some(id);
    }

    /// Appends a message to a conversation's log, preserving order.
    ///
    /// Content is never validated or size-limited. Returns the allocated
    /// message id, or `None` when the conversation does not exist.
    pub fn append_message(
        &mut self,
        id: ConversationId,
        role: Role,
        content: impl Into<String>,
    ) -> Option<MessageId> {
        let message_id = MessageId::new(self.next_message_id);
        let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|conversation| conversation.id == id)
        else {
            tracing::debug!(conversation_id = id.0, "ignoring append to unknown conversation");
            return None;
        };

        self.next_message_id = self.next_message_id.saturating_add(1);
        conversation
            .messages
            .push(Message::new(message_id, role, content));
        Some(message_id)
    }

    /// Submits composer text to the active conversation.
    ///
    /// Blank text (after trimming) is suppressed entirely. Otherwise the
    /// raw text is appended as a user message and a pending reply session
    /// is registered against the conversation that is active right now.
    /// The returned target is what the caller schedules delivery for.
    pub fn submit(&mut self, text: &str) -> Option<ReplyTarget> {
        if text.trim().is_empty() {
            return None;
        }

        let conversation_id = self.active?;
        self.append_message(conversation_id, Role::User, text)?;

        let session_id = ReplySessionId::new(self.next_reply_session_id);
        self.next_reply_session_id = self.next_reply_session_id.saturating_add(1);

        let target = ReplyTarget::new(conversation_id, session_id);
        self.replies.register(target);
        Some(target)
    }

    /// Delivers the canned reply for a previously submitted target.
    ///
    /// Appends to the conversation captured at submit time, not to the
    /// current active selection. Returns false without appending anywhere
    /// when the session was already delivered or cancelled, or when the
    /// target conversation no longer exists.
    pub fn deliver_reply(&mut self, target: ReplyTarget) -> bool {
        if !self.replies.take(target) {
            tracing::debug!(
                conversation_id = target.conversation_id.0,
                session_id = target.session_id.0,
                "dropping reply for cancelled or delivered session"
            );
            return false;
        }

        let canned_reply = self.canned_reply.clone();
        self.append_message(target.conversation_id, Role::Assistant, canned_reply)
            .is_some()
    }

    fn alloc_message_id(&mut self) -> MessageId {
        let id = MessageId::new(self.next_message_id);
        self.next_message_id = self.next_message_id.saturating_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(conversation: &Conversation) -> Vec<(Role, &str)> {
        conversation
            .messages
            .iter()
            .map(|message| (message.role, message.content.as_str()))
            .collect()
    }

    #[test]
    fn create_seeds_greeting_and_activates() {
        let mut store = ConversationStore::new();
        let id = store.create(Some("Work"));

        assert_eq!(store.active_id(), Some(id));
        let conversation = store.conversation(id).unwrap();
        assert_eq!(conversation.name, "Work");
        assert_eq!(contents(conversation), vec![(Role::Assistant, DEFAULT_GREETING)]);
    }

    #[test]
    fn create_defaults_blank_names_from_the_allocated_id() {
        let mut store = ConversationStore::new();
        let first = store.create(None);
        let second = store.create(Some("   "));

        assert_eq!(store.conversation(first).unwrap().name, "New Chat 1");
        assert_eq!(store.conversation(second).unwrap().name, "New Chat 2");
    }

    #[test]
    fn conversation_ids_stay_strictly_increasing_across_deletes() {
        let mut store = ConversationStore::new();
        let mut assigned = Vec::new();

        for round in 0..5 {
            let id = store.create(None);
            assigned.push(id);
            if round % 2 == 0 {
                store.delete(id);
            }
        }

        for pair in assigned.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn rename_trims_and_blank_rename_retains() {
        let mut store = ConversationStore::new();
        let id = store.create(Some("Original"));

        store.rename(id, "  Foo  ");
        assert_eq!(store.conversation(id).unwrap().name, "Foo");

        store.rename(id, "");
        assert_eq!(store.conversation(id).unwrap().name, "Foo");

        store.rename(id, "   ");
        assert_eq!(store.conversation(id).unwrap().name, "Foo");
    }

    #[test]
    fn rename_and_select_of_unknown_ids_are_no_ops() {
        let mut store = ConversationStore::new();
        let id = store.create(Some("Only"));

        store.rename(ConversationId::new(99), "Ghost");
        store.select(ConversationId::new(99));

        assert_eq!(store.active_id(), Some(id));
        assert_eq!(store.conversation(id).unwrap().name, "Only");
    }

    #[test]
    fn deleting_the_active_conversation_falls_back_to_first_remaining() {
        let mut store = ConversationStore::new();
        let first = store.create(None);
        let second = store.create(None);
        let third = store.create(None);

        store.select(second);
        store.delete(second);

        assert_eq!(store.active_id(), Some(first));
        assert_eq!(
            store
                .conversations()
                .iter()
                .map(|conversation| conversation.id)
                .collect::<Vec<_>>(),
            vec![first, third]
        );
    }

    #[test]
    fn deleting_an_inactive_conversation_keeps_the_selection() {
        let mut store = ConversationStore::new();
        let first = store.create(None);
        let second = store.create(None);

        store.select(second);
        store.delete(first);

        assert_eq!(store.active_id(), Some(second));
    }

    #[test]
    fn deleting_the_last_conversation_empties_the_selection() {
        let mut store = ConversationStore::new();
        let id = store.create(None);

        store.delete(id);

        assert!(store.conversations().is_empty());
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        let mut store = ConversationStore::new();
        let id = store.create(None);

        let cancelled = store.delete(ConversationId::new(42));

        assert!(cancelled.is_empty());
        assert_eq!(store.active_id(), Some(id));
        assert_eq!(store.conversations().len(), 1);
    }

    #[test]
    fn blank_submits_append_nothing_and_schedule_nothing() {
        let mut store = ConversationStore::new();
        store.create(None);
        let before = store.message_count();

        assert_eq!(store.submit(""), None);
        assert_eq!(store.submit("   "), None);
        assert_eq!(store.message_count(), before);
        assert_eq!(store.pending_reply_count(), 0);
    }

    #[test]
    fn submit_without_any_conversation_is_suppressed() {
        let mut store = ConversationStore::new();

        assert_eq!(store.submit("hi"), None);
        assert_eq!(store.pending_reply_count(), 0);
    }

    #[test]
    fn submit_then_delivery_appends_user_and_canned_reply_in_order() {
        let mut store = ConversationStore::new();
        let id = store.create(None);

        let target = store.submit("hi").unwrap();
        assert_eq!(target.conversation_id, id);
        assert_eq!(
            contents(store.conversation(id).unwrap()),
            vec![(Role::Assistant, DEFAULT_GREETING), (Role::User, "hi")]
        );

        assert!(store.deliver_reply(target));
        assert_eq!(
            contents(store.conversation(id).unwrap()),
            vec![
                (Role::Assistant, DEFAULT_GREETING),
                (Role::User, "hi"),
                (Role::Assistant, CANNED_REPLY),
            ]
        );

        // A second delivery of the same session must not append again.
        assert!(!store.deliver_reply(target));
        assert_eq!(store.conversation(id).unwrap().messages.len(), 3);
    }

    #[test]
    fn reply_lands_in_the_captured_conversation_after_switching() {
        let mut store = ConversationStore::new();
        let first = store.create(None);
        let second = store.create(None);

        store.select(first);
        let target = store.submit("hi").unwrap();
        store.select(second);

        assert!(store.deliver_reply(target));
        assert_eq!(store.conversation(first).unwrap().messages.len(), 3);
        assert_eq!(store.conversation(second).unwrap().messages.len(), 1);
    }

    #[test]
    fn deleting_the_target_before_delivery_makes_delivery_a_global_no_op() {
        let mut store = ConversationStore::new();
        let doomed = store.create(None);
        store.create(None);

        store.select(doomed);
        let target = store.submit("hi").unwrap();
        let total_before = store.message_count();

        let cancelled = store.delete(doomed);
        assert_eq!(cancelled, vec![target.session_id]);

        assert!(!store.deliver_reply(target));
        assert_eq!(
            store.message_count(),
            total_before - 2,
            "delivery after delete must not append anywhere"
        );
    }

    #[test]
    fn rapid_submits_register_independent_sessions_each_delivering_once() {
        let mut store = ConversationStore::new();
        let id = store.create(None);

        let first = store.submit("one").unwrap();
        let second = store.submit("two").unwrap();
        assert_ne!(first.session_id, second.session_id);
        assert_eq!(store.pending_reply_count(), 2);

        assert!(store.deliver_reply(first));
        assert!(store.deliver_reply(second));
        assert_eq!(store.pending_reply_count(), 0);

        let log = contents(store.conversation(id).unwrap());
        assert_eq!(
            log,
            vec![
                (Role::Assistant, DEFAULT_GREETING),
                (Role::User, "one"),
                (Role::User, "two"),
                (Role::Assistant, CANNED_REPLY),
                (Role::Assistant, CANNED_REPLY),
            ]
        );
    }

    #[test]
    fn configured_texts_flow_through_greeting_and_reply() {
        let mut store = ConversationStore::with_texts("Welcome.", "Noted.");
        let id = store.create(None);
        let target = store.submit("hello").unwrap();
        store.deliver_reply(target);

        assert_eq!(
            contents(store.conversation(id).unwrap()),
            vec![
                (Role::Assistant, "Welcome."),
                (Role::User, "hello"),
                (Role::Assistant, "Noted."),
            ]
        );
    }
}
