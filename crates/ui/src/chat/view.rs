use std::collections::HashMap;
use std::time::Duration;

use gpui::*;
use gpui_component::{ActiveTheme, v_flex};

use banter_store::{Command, ConversationStore, Effect, ReplySessionId, ReplyTarget};

use crate::chat::events::{
    ActiveConversationChanged, ConversationSelected, CreateRequested, DeleteRequested,
    RenameCommitted, SidebarToggleClicked, Submit,
};
use crate::chat::{ChatSidebar, ConversationRow, MessageInput, MessageList};
use crate::settings::AppSettings;

/// Name given to the conversation seeded at startup, before any naming flow.
const INITIAL_CONVERSATION_NAME: &str = "New Chat";

/// Parent coordinator for sidebar/message list/composer orchestration.
///
/// Owns the [`ConversationStore`] and is the only place that mutates it:
/// every child event is translated into a [`Command`], and the returned
/// effects drive the reply timers. Timer tasks are keyed by reply session
/// so a cancellation effect can drop them; a task that outlives its
/// session still no-ops inside the store.
pub struct ChatView {
    store: ConversationStore,
    sidebar: Entity<ChatSidebar>,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    reply_delay: Duration,
    reply_tasks: HashMap<ReplySessionId, Task<()>>,
    last_synced_active: Option<banter_store::ConversationId>,
    active_title: Option<SharedString>,
}

impl EventEmitter<SidebarToggleClicked> for ChatView {}
impl EventEmitter<ActiveConversationChanged> for ChatView {}

impl ChatView {
    pub fn new(settings: &AppSettings, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let sidebar = cx.new(|cx| ChatSidebar::new(window, cx));
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(window, cx));

        let mut store = ConversationStore::with_texts(&settings.greeting, &settings.canned_reply);
        // Seed the first conversation so the composer always has a target,
        // matching the single pre-created chat users see on first launch.
        store.create(Some(INITIAL_CONVERSATION_NAME));

        cx.subscribe(&sidebar, |this, _, event: &ConversationSelected, cx| {
            this.dispatch(
                Command::Select {
                    id: event.conversation_id,
                },
                cx,
            );
        })
        .detach();

        cx.subscribe(&sidebar, |this, _, event: &CreateRequested, cx| {
            let name = event.name.trim();
            let name = if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            };
            this.dispatch(Command::Create { name }, cx);
        })
        .detach();

        cx.subscribe(&sidebar, |this, _, event: &RenameCommitted, cx| {
            this.dispatch(
                Command::Rename {
                    id: event.conversation_id,
                    name: event.name.clone(),
                },
                cx,
            );
        })
        .detach();

        cx.subscribe(&sidebar, |this, _, event: &DeleteRequested, cx| {
            this.dispatch(
                Command::Delete {
                    id: event.conversation_id,
                },
                cx,
            );
        })
        .detach();

        cx.subscribe(&sidebar, |_, _, _event: &SidebarToggleClicked, cx| {
            cx.emit(SidebarToggleClicked);
        })
        .detach();

        cx.subscribe(&message_input, |this, _, event: &Submit, cx| {
            this.dispatch(
                Command::Submit {
                    text: event.content.clone(),
                },
                cx,
            );
        })
        .detach();

        let mut this = Self {
            store,
            sidebar,
            message_list,
            message_input,
            reply_delay: settings.reply_delay(),
            reply_tasks: HashMap::new(),
            last_synced_active: None,
            active_title: None,
        };
        this.sync_children(cx);
        this
    }

    pub fn sidebar(&self) -> &Entity<ChatSidebar> {
        &self.sidebar
    }

    /// Display name of the active conversation, if any.
    pub fn active_conversation_name(&self) -> Option<SharedString> {
        self.active_title.clone()
    }

    /// Starts the sidebar's naming flow for a new conversation.
    pub fn request_new_conversation(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.sidebar.update(cx, |sidebar, cx| {
            sidebar.begin_naming(window, cx);
        });
    }

    fn dispatch(&mut self, command: Command, cx: &mut Context<Self>) {
        let effects = self.store.apply(command);

        for effect in effects {
            match effect {
                Effect::ScheduleReply { target } => self.schedule_reply(target, cx),
                Effect::CancelReplies { sessions } => {
                    // Dropping a task cancels its timer.
                    for session_id in sessions {
                        self.reply_tasks.remove(&session_id);
                    }
                }
            }
        }

        self.sync_children(cx);
    }

    fn schedule_reply(&mut self, target: ReplyTarget, cx: &mut Context<Self>) {
        let delay = self.reply_delay;
        tracing::debug!(
            conversation_id = target.conversation_id.0,
            session_id = target.session_id.0,
            delay_ms = delay.as_millis() as u64,
            "scheduling canned reply"
        );

        let task = cx.spawn(async move |this, cx| {
            cx.background_executor().timer(delay).await;

            let _ = this.update(cx, |this, cx| {
                this.reply_tasks.remove(&target.session_id);
                this.dispatch(Command::DeliverReply { target }, cx);
            });
        });

        self.reply_tasks.insert(target.session_id, task);
    }

    fn sync_children(&mut self, cx: &mut Context<Self>) {
        let rows = self
            .store
            .conversations()
            .iter()
            .map(|conversation| ConversationRow {
                id: conversation.id,
                name: SharedString::from(conversation.name.clone()),
            })
            .collect::<Vec<_>>();
        let active = self.store.active_id();

        self.sidebar.update(cx, |sidebar, cx| {
            sidebar.set_conversations(rows, active, cx);
        });

        let messages = self
            .store
            .active()
            .map(|conversation| conversation.messages.clone())
            .unwrap_or_default();
        let switched = self.last_synced_active != active;
        self.last_synced_active = active;

        let title = self
            .store
            .active()
            .map(|conversation| SharedString::from(conversation.name.clone()));
        if title != self.active_title {
            self.active_title = title;
            cx.emit(ActiveConversationChanged);
        }

        self.message_list.update(cx, |list, cx| {
            list.set_messages(messages, cx);
            if switched {
                list.request_scroll_to_bottom(cx);
            }
        });

        cx.notify();
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .id("chat-view")
            .relative()
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .bg(theme.background)
            .child(
                div()
                    .id("chat-view-message-list")
                    .flex_1()
                    .min_h_0()
                    .child(self.message_list.clone()),
            )
            .child(
                div()
                    .id("chat-view-message-input")
                    .flex_shrink_0()
                    .w_full()
                    .border_t_1()
                    .border_color(theme.border)
                    .child(self.message_input.clone()),
            )
    }
}
