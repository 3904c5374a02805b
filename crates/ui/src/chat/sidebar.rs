use std::rc::Rc;

use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable, VirtualListScrollHandle,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
    label::Label,
    list::ListItem,
    v_flex, v_virtual_list,
};

use banter_store::ConversationId;

use crate::chat::events::{
    ConversationSelected, CreateRequested, DeleteRequested, RenameCommitted, SidebarToggleClicked,
};

const CONVERSATION_ROW_HEIGHT: f32 = 40.0;

/// One sidebar entry, snapshotted from the store by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRow {
    pub id: ConversationId,
    pub name: SharedString,
}

/// Conversation list with new-chat, inline-rename, and delete controls.
///
/// The sidebar holds no conversation state of its own: the coordinator
/// pushes a row snapshot after every store mutation, and every control
/// emits an event instead of mutating anything directly.
pub struct ChatSidebar {
    rows: Vec<ConversationRow>,
    selected: Option<ConversationId>,
    naming_input: Entity<InputState>,
    is_naming: bool,
    rename_input: Entity<InputState>,
    renaming: Option<ConversationId>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    scroll_handle: VirtualListScrollHandle,
}

impl EventEmitter<ConversationSelected> for ChatSidebar {}
impl EventEmitter<CreateRequested> for ChatSidebar {}
impl EventEmitter<RenameCommitted> for ChatSidebar {}
impl EventEmitter<DeleteRequested> for ChatSidebar {}
impl EventEmitter<SidebarToggleClicked> for ChatSidebar {}

impl ChatSidebar {
    pub fn new(window: &mut Window, cx: &mut Context<Self>) -> Self {
        let naming_input =
            cx.new(|cx| InputState::new(window, cx).placeholder("Enter chat name"));
        let rename_input = cx.new(|cx| InputState::new(window, cx).clean_on_escape());

        cx.subscribe_in(
            &naming_input,
            window,
            |this, _, event: &InputEvent, window, cx| {
                if let InputEvent::PressEnter { .. } = event {
                    this.confirm_create(window, cx);
                }
            },
        )
        .detach();

        cx.subscribe_in(
            &rename_input,
            window,
            |this, _, event: &InputEvent, window, cx| match event {
                InputEvent::PressEnter { .. } => this.commit_rename(window, cx),
                // Clicking away commits, matching the blur-to-commit binding.
                InputEvent::Blur => this.commit_rename(window, cx),
                _ => {}
            },
        )
        .detach();

        Self {
            rows: Vec::new(),
            selected: None,
            naming_input,
            is_naming: false,
            rename_input,
            renaming: None,
            item_sizes: Rc::new(Vec::new()),
            scroll_handle: VirtualListScrollHandle::new(),
        }
    }

    pub fn selected_conversation(&self) -> Option<ConversationId> {
        self.selected
    }

    /// Replaces the rendered snapshot after a store mutation.
    pub fn set_conversations(
        &mut self,
        rows: Vec<ConversationRow>,
        selected: Option<ConversationId>,
        cx: &mut Context<Self>,
    ) {
        // Abandon an in-flight rename when its row disappeared.
        if self
            .renaming
            .is_some_and(|renaming| !rows.iter().any(|row| row.id == renaming))
        {
            self.renaming = None;
        }

        self.rows = rows;
        self.selected = selected;
        self.rebuild_item_sizes();
        cx.notify();
    }

    /// Opens the naming flow for a new conversation.
    pub fn begin_naming(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.is_naming = true;
        self.naming_input.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
        window.focus(&self.naming_input.focus_handle(cx));
        cx.notify();
    }

    fn confirm_create(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let name = self.naming_input.read(cx).value().to_string();
        self.is_naming = false;
        self.naming_input.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
        cx.emit(CreateRequested { name });
        cx.notify();
    }

    fn cancel_naming(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.is_naming = false;
        self.naming_input.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
        cx.notify();
    }

    fn begin_rename(
        &mut self,
        conversation_id: ConversationId,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let Some(row) = self.rows.iter().find(|row| row.id == conversation_id) else {
            return;
        };

        let current_name = row.name.to_string();
        self.renaming = Some(conversation_id);
        self.rename_input.update(cx, |state, cx| {
            state.set_value(current_name, window, cx);
        });
        window.focus(&self.rename_input.focus_handle(cx));
        cx.notify();
    }

    fn commit_rename(&mut self, _window: &mut Window, cx: &mut Context<Self>) {
        // Enter-then-blur delivers two commit chances; only the first wins.
        let Some(conversation_id) = self.renaming.take() else {
            return;
        };

        let name = self.rename_input.read(cx).value().to_string();
        cx.emit(RenameCommitted {
            conversation_id,
            name,
        });
        cx.notify();
    }

    fn select_conversation(&mut self, conversation_id: ConversationId, cx: &mut Context<Self>) {
        cx.emit(ConversationSelected { conversation_id });
    }

    fn rebuild_item_sizes(&mut self) {
        let sizes = self
            .rows
            .iter()
            .map(|_| size(px(0.), px(CONVERSATION_ROW_HEIGHT)))
            .collect::<Vec<_>>();
        self.item_sizes = Rc::new(sizes);
    }

    fn render_toolbar(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        if self.is_naming {
            h_flex()
                .w_full()
                .min_w_0()
                .gap_2()
                .px_3()
                .pb_2()
                .child(Input::new(&self.naming_input).w_full().small())
                .child(
                    Button::new("confirm-new")
                        .small()
                        .primary()
                        .icon(IconName::Plus)
                        .on_click(cx.listener(|this, _, window, cx| {
                            this.confirm_create(window, cx);
                        })),
                )
                .child(
                    Button::new("cancel-new")
                        .small()
                        .ghost()
                        .icon(IconName::CircleX)
                        .on_click(cx.listener(|this, _, window, cx| {
                            this.cancel_naming(window, cx);
                        })),
                )
                .into_any_element()
        } else {
            h_flex()
                .w_full()
                .min_w_0()
                .px_3()
                .pb_2()
                .child(
                    Button::new("new-chat")
                        .w_full()
                        .small()
                        .primary()
                        .icon(IconName::Plus)
                        .child("New Chat")
                        .on_click(cx.listener(|this, _, window, cx| {
                            this.begin_naming(window, cx);
                        })),
                )
                .into_any_element()
        }
    }

    fn render_empty_state(&mut self, cx: &mut Context<Self>) -> AnyElement {
        let theme = cx.theme();

        v_flex()
            .flex_1()
            .items_center()
            .justify_center()
            .px_4()
            .child(
                Label::new("No conversations yet")
                    .text_sm()
                    .text_color(theme.foreground.opacity(0.55)),
            )
            .into_any_element()
    }

    fn render_rename_row(&self) -> AnyElement {
        div()
            .w_full()
            .h(px(CONVERSATION_ROW_HEIGHT))
            .px_2()
            .flex()
            .items_center()
            .child(Input::new(&self.rename_input).w_full().small())
            .into_any_element()
    }

    fn render_conversation_row(
        &self,
        row: &ConversationRow,
        index: usize,
        cx: &mut Context<Self>,
    ) -> AnyElement {
        let conversation_id = row.id;
        let name = row.name.clone();
        let is_selected = self.selected == Some(conversation_id);

        div()
            .w_full()
            .h(px(CONVERSATION_ROW_HEIGHT))
            .px_2()
            .child(
                ListItem::new(("conversation", index))
                    .w_full()
                    .h_full()
                    .px_3()
                    .py_2()
                    .rounded_md()
                    .selected(is_selected)
                    .on_click(cx.listener(move |this, _event: &ClickEvent, _window, cx| {
                        this.select_conversation(conversation_id, cx);
                    }))
                    .child(
                        h_flex()
                            .w_full()
                            .items_center()
                            .gap_1()
                            .child(
                                div()
                                    .flex_1()
                                    .min_w_0()
                                    .truncate()
                                    .child(Label::new(name).text_sm()),
                            )
                            .child(
                                Button::new(("rename", index))
                                    .ghost()
                                    .small()
                                    .child("Rename")
                                    .on_click(cx.listener(
                                        move |this, _event: &ClickEvent, window, cx| {
                                            cx.stop_propagation();
                                            this.begin_rename(conversation_id, window, cx);
                                        },
                                    )),
                            )
                            .child(
                                Button::new(("delete", index))
                                    .ghost()
                                    .small()
                                    .child("Delete")
                                    .on_click(cx.listener(
                                        move |this, _event: &ClickEvent, _window, cx| {
                                            cx.stop_propagation();
                                            cx.emit(DeleteRequested { conversation_id });
                                        },
                                    )),
                            ),
                    ),
            )
            .into_any_element()
    }

    fn render_conversation_list(&mut self, cx: &mut Context<Self>) -> AnyElement {
        if self.rows.is_empty() {
            return self.render_empty_state(cx);
        }

        let rows = self.rows.clone();
        let renaming = self.renaming;
        let item_sizes = self.item_sizes.clone();

        v_flex()
            .flex_1()
            .min_h_0()
            .child(
                v_virtual_list(
                    cx.entity().clone(),
                    "conversation-list",
                    item_sizes,
                    move |this, visible_range, _window, cx| {
                        visible_range
                            .filter_map(|index| {
                                rows.get(index).map(|row| {
                                    if renaming == Some(row.id) {
                                        this.render_rename_row()
                                    } else {
                                        this.render_conversation_row(row, index, cx)
                                    }
                                })
                            })
                            .collect::<Vec<_>>()
                    },
                )
                .w_full()
                .flex_1()
                .track_scroll(&self.scroll_handle),
            )
            .into_any_element()
    }

    fn render_footer(&mut self, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .min_w_0()
            .items_center()
            .justify_end()
            .px_3()
            .py_2()
            .border_t_1()
            .border_color(theme.border)
            .child(
                Button::new("sidebar-toggle")
                    .ghost()
                    .small()
                    .icon(IconName::PanelLeftClose)
                    .on_click(cx.listener(|_, _, _, cx| {
                        cx.emit(SidebarToggleClicked);
                    })),
            )
    }
}

impl Render for ChatSidebar {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        v_flex()
            .size_full()
            .min_w_0()
            .overflow_hidden()
            .bg(theme.background)
            .pt(px(8.))
            .child(self.render_toolbar(cx))
            .child(self.render_conversation_list(cx))
            .child(self.render_footer(cx))
    }
}
