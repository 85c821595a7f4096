pub mod clipboard;
pub mod config;
pub mod document;
pub mod history;
pub mod shortcuts;

pub use clipboard::Clipboard;
pub use config::EditorConfig;
pub use document::{DocumentState, Selection};
pub use history::{DEFAULT_HISTORY_LIMIT, History, HistoryEntry};
pub use shortcuts::{ShortcutAction, ShortcutMap};
