use std::collections::HashMap;

use crate::model::{ConversationId, ReplySessionId, ReplyTarget};

/// Fixed assistant text appended when a scheduled reply is delivered.
pub const CANNED_REPLY: &str = "This is a simulated AI response.";
/// Assistant greeting seeded into every new conversation.
pub const DEFAULT_GREETING: &str = "Hello! How can I assist you today?";
/// Delay between submit and canned-reply delivery.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 1_000;

/// Tracks replies that have been scheduled but not yet delivered.
///
/// Each submit registers one session; delivery consumes it, so a session
/// can deliver at most once. Deleting a conversation cancels every session
/// still aimed at it, which is what turns late timer callbacks into no-ops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplySchedule {
    pending: HashMap<ReplySessionId, ConversationId>,
}

impl ReplySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly captured target as pending.
    pub fn register(&mut self, target: ReplyTarget) {
        self.pending
            .insert(target.session_id, target.conversation_id);
    }

    /// Consumes the pending session if it still matches the target exactly.
    ///
    /// Returns false for unknown sessions, already-delivered sessions, and
    /// sessions whose conversation mapping does not match.
    pub fn take(&mut self, target: ReplyTarget) -> bool {
        match self.pending.get(&target.session_id) {
            Some(conversation_id) if *conversation_id == target.conversation_id => {
                self.pending.remove(&target.session_id);
                true
            }
            _ => false,
        }
    }

    /// Cancels every pending session aimed at the given conversation.
    ///
    /// Returns the cancelled session ids in ascending order so callers can
    /// drop their timer tasks deterministically.
    pub fn cancel_conversation(&mut self, conversation_id: ConversationId) -> Vec<ReplySessionId> {
        let mut cancelled = self
            .pending
            .iter()
            .filter(|(_, pending_conversation)| **pending_conversation == conversation_id)
            .map(|(session_id, _)| *session_id)
            .collect::<Vec<_>>();
        cancelled.sort_unstable();

        for session_id in &cancelled {
            self.pending.remove(session_id);
        }

        cancelled
    }

    /// Returns true while the target is registered and undelivered.
    pub fn is_pending(&self, target: ReplyTarget) -> bool {
        self.pending.get(&target.session_id) == Some(&target.conversation_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(conversation: u64, session: u64) -> ReplyTarget {
        ReplyTarget::new(
            ConversationId::new(conversation),
            ReplySessionId::new(session),
        )
    }

    #[test]
    fn take_consumes_each_session_exactly_once() {
        let mut schedule = ReplySchedule::new();
        schedule.register(target(1, 10));

        assert!(schedule.is_pending(target(1, 10)));
        assert!(schedule.take(target(1, 10)));
        assert!(!schedule.take(target(1, 10)));
        assert_eq!(schedule.pending_count(), 0);
    }

    #[test]
    fn take_rejects_unknown_and_mismatched_targets() {
        let mut schedule = ReplySchedule::new();
        schedule.register(target(1, 10));

        assert!(!schedule.take(target(1, 11)));
        // Session known but remapped conversation does not match.
        assert!(!schedule.take(target(2, 10)));
        assert!(schedule.is_pending(target(1, 10)));
    }

    #[test]
    fn cancel_conversation_drops_only_its_sessions_in_order() {
        let mut schedule = ReplySchedule::new();
        schedule.register(target(1, 12));
        schedule.register(target(2, 11));
        schedule.register(target(1, 10));

        let cancelled = schedule.cancel_conversation(ConversationId::new(1));

        assert_eq!(
            cancelled,
            vec![ReplySessionId::new(10), ReplySessionId::new(12)]
        );
        assert!(schedule.is_pending(target(2, 11)));
        assert_eq!(schedule.pending_count(), 1);
    }
}
