use crate::model::{ConversationId, ReplySessionId, ReplyTarget};
use crate::store::ConversationStore;

/// One discrete user (or timer) action against the store.
///
/// Presentation code translates every interaction into a command instead
/// of mutating state directly, so a recorded command stream can be
/// replayed against a fresh store in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { name: Option<String> },
    Rename { id: ConversationId, name: String },
    Delete { id: ConversationId },
    Select { id: ConversationId },
    Submit { text: String },
    DeliverReply { target: ReplyTarget },
}

/// Work the caller must perform outside the store after applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a single-shot timer that later feeds back
    /// [`Command::DeliverReply`] for this target.
    ScheduleReply { target: ReplyTarget },
    /// Drop the timer tasks for these cancelled sessions.
    CancelReplies { sessions: Vec<ReplySessionId> },
}

impl ConversationStore {
    /// Applies one command, returning the effects it produced.
    pub fn apply(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::Create { name } => {
                self.create(name.as_deref());
                Vec::new()
            }
            Command::Rename { id, name } => {
                self.rename(id, &name);
                Vec::new()
            }
            Command::Delete { id } => {
                let sessions = self.delete(id);
                if sessions.is_empty() {
                    Vec::new()
                } else {
                    vec![Effect::CancelReplies { sessions }]
                }
            }
            Command::Select { id } => {
                self.select(id);
                Vec::new()
            }
            Command::Submit { text } => match self.submit(&text) {
                Some(target) => vec![Effect::ScheduleReply { target }],
                None => Vec::new(),
            },
            Command::DeliverReply { target } => {
                self.deliver_reply(target);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn replay(commands: &[Command]) -> ConversationStore {
        let mut store = ConversationStore::new();
        for command in commands {
            store.apply(command.clone());
        }
        store
    }

    #[test]
    fn submit_produces_a_schedule_effect_and_delete_cancels_it() {
        let mut store = ConversationStore::new();
        store.apply(Command::Create { name: None });

        let effects = store.apply(Command::Submit {
            text: "hi".to_string(),
        });
        let [Effect::ScheduleReply { target }] = effects.as_slice() else {
            panic!("expected exactly one schedule effect, got {effects:?}");
        };
        let target = *target;

        let effects = store.apply(Command::Delete {
            id: target.conversation_id,
        });
        assert_eq!(
            effects,
            vec![Effect::CancelReplies {
                sessions: vec![target.session_id]
            }]
        );
    }

    #[test]
    fn blank_submit_and_unknown_id_commands_produce_no_effects() {
        let mut store = ConversationStore::new();
        store.apply(Command::Create { name: None });

        assert!(store
            .apply(Command::Submit {
                text: "   ".to_string()
            })
            .is_empty());
        assert!(store
            .apply(Command::Delete {
                id: ConversationId::new(77)
            })
            .is_empty());
    }

    #[test]
    fn replaying_a_command_stream_reproduces_the_snapshot() {
        let first = ConversationId::new(1);
        let second = ConversationId::new(2);
        let commands = vec![
            Command::Create {
                name: Some("New Chat".to_string()),
            },
            Command::Create { name: None },
            Command::Rename {
                id: second,
                name: "  Plans  ".to_string(),
            },
            Command::Select { id: first },
            Command::Submit {
                text: "hi".to_string(),
            },
            Command::DeliverReply {
                target: ReplyTarget::new(first, ReplySessionId::new(1)),
            },
            Command::Delete { id: second },
        ];

        let replayed = replay(&commands);
        let replayed_again = replay(&commands);

        assert_eq!(replayed, replayed_again);
        assert_eq!(replayed.active_id(), Some(first));
        assert_eq!(replayed.conversations().len(), 1);

        let conversation = replayed.conversation(first).unwrap();
        assert_eq!(conversation.name, "New Chat");
        assert_eq!(
            conversation
                .messages
                .iter()
                .map(|message| message.role)
                .collect::<Vec<_>>(),
            vec![Role::Assistant, Role::User, Role::Assistant]
        );
    }
}
