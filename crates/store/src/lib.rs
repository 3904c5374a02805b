#![deny(unsafe_code)]

//! In-memory conversation state for the banter chat app.
//!
//! Everything here is plain data plus synchronous mutation: no rendering,
//! no I/O, no timers. The UI layer feeds [`Command`]s in and performs the
//! returned [`Effect`]s (scheduling and cancelling reply timers), so the
//! whole state machine stays unit-testable without a window.

/// Command dispatch over the store.
pub mod command;
/// Domain entities and typed identifiers.
pub mod model;
/// Canned-reply defaults and pending-delivery bookkeeping.
pub mod reply;
/// The conversation store itself.
pub mod store;

pub use command::{Command, Effect};
pub use model::{
    Conversation, ConversationId, Message, MessageId, ReplySessionId, ReplyTarget, Role,
};
pub use reply::{CANNED_REPLY, DEFAULT_GREETING, DEFAULT_REPLY_DELAY_MS, ReplySchedule};
pub use store::{ConversationStore, default_conversation_name};
