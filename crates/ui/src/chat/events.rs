use banter_store::ConversationId;

/// Emitted when sidebar selection changes the active conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationSelected {
    pub conversation_id: ConversationId,
}

/// Emitted when the new-chat naming flow confirms.
///
/// The name is passed through untrimmed; a blank name falls back to the
/// store's default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequested {
    pub name: String,
}

/// Emitted when an inline rename commits via Enter or blur.
///
/// A blank name retains the conversation's current name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCommitted {
    pub conversation_id: ConversationId,
    pub name: String,
}

/// Emitted when a row's delete control is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeleteRequested {
    pub conversation_id: ConversationId,
}

/// Emitted from the sidebar footer collapse control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarToggleClicked;

/// Emitted when the active conversation's display name changes, either by
/// switching conversations or by renaming the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveConversationChanged;

/// Emitted when the composer submits non-blank text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submit {
    pub content: String,
}

impl Submit {
    /// Creates a submit event.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
