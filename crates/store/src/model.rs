/// Stable identifier for one conversation.
///
/// Ids are assigned monotonically by the store and never reused, even
/// after the conversation they named has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(pub u64);

impl ConversationId {
    /// Creates a typed conversation identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Stable identifier for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a typed message identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Identifier for one scheduled canned-reply delivery.
///
/// A fresh session is allocated on every submit so each pending reply can
/// be consumed or cancelled independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplySessionId(pub u64);

impl ReplySessionId {
    /// Creates a typed reply session identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Routing key for a delayed reply, captured at submit time.
///
/// The reply is always delivered to `conversation_id` as it was when the
/// user submitted, regardless of which conversation is active when the
/// timer fires. If that conversation has been deleted in the meantime the
/// delivery becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTarget {
    pub conversation_id: ConversationId,
    pub session_id: ReplySessionId,
}

impl ReplyTarget {
    /// Builds a full reply target from conversation and session ids.
    pub const fn new(conversation_id: ConversationId, session_id: ReplySessionId) -> Self {
        Self {
            conversation_id,
            session_id,
        }
    }
}

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

/// One entry in a conversation's append-only message log.
///
/// Messages are immutable once appended; there is no per-message edit or
/// delete operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Creates a message.
    pub fn new(id: MessageId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }
}

/// A named, ordered log of messages with a unique id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub name: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new(id: ConversationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            messages: Vec::new(),
        }
    }
}
