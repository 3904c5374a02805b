/// Event contracts for chat module wiring.
pub mod events;
pub mod message_input;
pub mod message_list;
pub mod sidebar;
pub mod view;

pub use events::{
    ActiveConversationChanged, ConversationSelected, CreateRequested, DeleteRequested,
    RenameCommitted, SidebarToggleClicked, Submit,
};
pub use message_input::MessageInput;
pub use message_list::MessageList;
pub use sidebar::{ChatSidebar, ConversationRow};
pub use view::ChatView;
