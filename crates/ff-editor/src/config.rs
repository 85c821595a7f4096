use crate::history::DEFAULT_HISTORY_LIMIT;

/// Configuration for a `DocumentState`.
///
/// Defaults match the form builder's interactive behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Maximum number of undo steps kept. Oldest entries are dropped first.
    /// Default: **100**.
    pub history_limit: usize,

    /// When `add_node` targets a missing parent or a non-container, append the
    /// new component to the end of the top-level list instead of rejecting
    /// the add. Applies to `add_node` only; moves and pastes never fall back.
    /// Default: **true**.
    pub fallback_to_root: bool,

    /// Select newly inserted components (add, paste, duplicate).
    /// Default: **true**.
    pub select_inserted: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            fallback_to_root: true,
            select_inserted: true,
        }
    }
}
