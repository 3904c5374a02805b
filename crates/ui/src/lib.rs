#![deny(unsafe_code)]

/// Application shell and root layout.
pub mod app;
/// Chat components: sidebar, message list, composer, and the coordinator
/// that owns the conversation store.
pub mod chat;
/// Settings loading and persistence.
pub mod settings;

/// Returns a stable marker used by integration smoke tests.
pub fn smoke_marker() -> &'static str {
    "banter"
}
