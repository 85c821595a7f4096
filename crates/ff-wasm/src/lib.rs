//! WASM bridge for Form Forge: exposes the document engine to the
//! form builder UI.
//!
//! Compiled via `wasm-pack build --target web`. Everything crossing the
//! boundary is a primitive or a JSON string: component IDs are strings, an
//! empty parent ID means the top level, and a negative index means append.

use ff_core::persist::{normalize_containers, parse_tree_json, tree_to_json};
use ff_core::{
    LintDiagnostic, LintSeverity, NodeId, NodeKind, PersistedDocument, Properties,
    lint_document,
};
use ff_editor::{DocumentState, ShortcutAction, ShortcutMap};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
#[wasm_bindgen]
pub struct FormEditor {
    state: DocumentState,
}

impl Default for FormEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl FormEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        Self {
            state: DocumentState::new(),
        }
    }

    // ─── Document I/O ────────────────────────────────────────────────────

    /// Load a persisted document (`{"version", "nodes", "snapshots"}`) or a
    /// bare node array. History starts over. Returns `false` on bad input.
    pub fn load_json(&mut self, json: &str) -> bool {
        let doc = if json.trim_start().starts_with('[') {
            parse_tree_json(json).map(|tree| PersistedDocument::new(tree, Vec::new()))
        } else {
            PersistedDocument::from_json(json)
        };
        match doc.and_then(|doc| self.state.load(doc)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("load failed: {e}");
                false
            }
        }
    }

    /// The persisted document (tree plus named snapshots) as JSON.
    pub fn to_json(&self) -> String {
        self.state.to_persisted().to_json().unwrap_or_else(|e| {
            log::warn!("{e}");
            String::new()
        })
    }

    /// The current tree as a bare node array, for export collaborators.
    pub fn tree_json(&self) -> String {
        tree_to_json(self.state.tree()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Structural edits ─────────────────────────────────────────────────

    /// Add a component by kind name (e.g. `"text_input"`). Returns the new
    /// ID, or an empty string if nothing was added.
    pub fn add_node(&mut self, kind: &str, parent_id: &str, index: i32) -> String {
        let Some(kind) = NodeKind::from_name(kind) else {
            log::warn!("add: unknown kind `{kind}`");
            return String::new();
        };
        let (parent, index) = match parent_arg(parent_id) {
            Ok(parent) => (parent, index_arg(index)),
            // Same policy as a parent that is missing from the tree.
            Err(e) if self.state.config().fallback_to_root => {
                log::debug!("add {kind}: {e}, appending at top level");
                (None, None)
            }
            Err(e) => {
                log::warn!("add {kind} refused: {e}");
                return String::new();
            }
        };
        self.state
            .add_node(kind, parent, index)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn move_node(&mut self, node_id: &str, parent_id: &str, index: i32) -> bool {
        let Some(id) = NodeId::lookup(node_id) else {
            return false;
        };
        match parent_arg(parent_id) {
            Ok(parent) => self.state.move_node(id, parent, index_arg(index)),
            Err(e) => {
                log::warn!("move refused: {e}");
                false
            }
        }
    }

    /// Drag-to-reorder among siblings.
    pub fn reorder(&mut self, active_id: &str, over_id: &str) -> bool {
        match (NodeId::lookup(active_id), NodeId::lookup(over_id)) {
            (Some(active), Some(over)) => self.state.reorder_siblings(active, over),
            _ => false,
        }
    }

    /// Remove components listed as a JSON array of IDs.
    pub fn remove_nodes(&mut self, ids_json: &str) -> bool {
        let ids = parse_ids(ids_json);
        self.state.remove_nodes(&ids)
    }

    /// Merge a JSON object of properties into a component.
    pub fn update_properties(&mut self, node_id: &str, patch_json: &str) -> bool {
        let Some(id) = NodeId::lookup(node_id) else {
            return false;
        };
        match serde_json::from_str::<Properties>(patch_json) {
            Ok(patch) => self.state.update_properties(id, patch),
            Err(e) => {
                log::warn!("update properties: bad patch: {e}");
                false
            }
        }
    }

    /// Replace the whole document with a bare node array. Undoable.
    pub fn replace_document(&mut self, json: &str) -> bool {
        match parse_tree_json(json) {
            Ok(tree) => self.state.replace_document(tree),
            Err(e) => {
                log::warn!("replace document: {e}");
                false
            }
        }
    }

    pub fn reset_document(&mut self) -> bool {
        self.state.reset_document()
    }

    // ─── Clipboard ────────────────────────────────────────────────────────

    /// Returns the number of subtrees copied.
    pub fn copy(&mut self) -> u32 {
        u32::try_from(self.state.copy()).unwrap_or(u32::MAX)
    }

    pub fn paste(&mut self) -> bool {
        self.state.paste()
    }

    pub fn duplicate(&mut self) -> bool {
        self.state.duplicate()
    }

    pub fn cut(&mut self) -> bool {
        self.state.cut()
    }

    // ─── History ──────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.state.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.state.redo().is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    // ─── Snapshots ────────────────────────────────────────────────────────

    pub fn save_snapshot(&mut self, name: &str) {
        self.state.save_snapshot(name);
    }

    pub fn restore_snapshot(&mut self, name: &str) -> bool {
        self.state.restore_snapshot(name)
    }

    pub fn delete_snapshot(&mut self, name: &str) -> bool {
        self.state.delete_snapshot(name)
    }

    /// Snapshot names as a JSON array.
    pub fn get_snapshot_names(&self) -> String {
        let names: Vec<&str> = self
            .state
            .snapshots()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Selection ────────────────────────────────────────────────────────

    /// Select components listed as a JSON array of IDs (`[]` clears).
    pub fn select(&mut self, ids_json: &str) {
        let ids = parse_ids(ids_json);
        self.state.select(&ids);
    }

    /// All selected IDs as a JSON array.
    pub fn get_selected_ids(&self) -> String {
        let ids: Vec<&str> = self.state.selection().iter().map(|id| id.as_str()).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns JSON `{"changed":bool,"action":"<name>"}`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let (changed, action) = match ShortcutMap::resolve(key, ctrl, shift, alt, meta) {
            Some(action) => (self.state.dispatch(action), action_to_name(action)),
            None => (false, "none"),
        };
        serde_json::json!({ "changed": changed, "action": action }).to_string()
    }

    // ─── Reads ────────────────────────────────────────────────────────────

    pub fn count_nodes(&self) -> u32 {
        u32::try_from(self.state.tree().count_nodes()).unwrap_or(u32::MAX)
    }

    /// A single component (with its subtree) as JSON, or an empty string.
    pub fn find_node_json(&self, node_id: &str) -> String {
        NodeId::lookup(node_id)
            .and_then(|id| self.state.tree().find_by_id(id))
            .and_then(|node| serde_json::to_string(node).ok())
            .unwrap_or_default()
    }

    /// Lint findings for the current document as a JSON array.
    pub fn lint_json(&self) -> String {
        diagnostics_json(&lint_document(self.state.tree()))
    }
}

// ─── Argument conversion ─────────────────────────────────────────────────

/// `""` is the top level. A string the interner has never seen cannot name
/// a component, so it is reported rather than interned.
fn parent_arg(parent_id: &str) -> Result<Option<NodeId>, String> {
    if parent_id.is_empty() {
        return Ok(None);
    }
    NodeId::lookup(parent_id)
        .map(Some)
        .ok_or_else(|| format!("unknown parent `{parent_id}`"))
}

fn index_arg(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

/// IDs from a JSON string array; IDs never seen by the interner are dropped.
fn parse_ids(ids_json: &str) -> Vec<NodeId> {
    match serde_json::from_str::<Vec<String>>(ids_json) {
        Ok(ids) => ids.iter().filter_map(|s| NodeId::lookup(s)).collect(),
        Err(e) => {
            log::warn!("bad id list: {e}");
            Vec::new()
        }
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::Delete => "delete",
        ShortcutAction::Duplicate => "duplicate",
        ShortcutAction::Copy => "copy",
        ShortcutAction::Cut => "cut",
        ShortcutAction::Paste => "paste",
        ShortcutAction::ClearAll => "clearAll",
        ShortcutAction::MoveUp => "moveUp",
        ShortcutAction::MoveDown => "moveDown",
        ShortcutAction::SelectAll => "selectAll",
        ShortcutAction::Deselect => "deselect",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticJson<'a> {
    node_id: &'a str,
    message: &'a str,
    severity: &'static str,
    rule: &'static str,
}

fn diagnostics_json(diags: &[LintDiagnostic]) -> String {
    let out: Vec<DiagnosticJson<'_>> = diags
        .iter()
        .map(|d| DiagnosticJson {
            node_id: d.node_id.as_str(),
            message: &d.message,
            severity: match d.severity {
                LintSeverity::Error => "error",
                LintSeverity::Warning => "warning",
                LintSeverity::Info => "info",
            },
            rule: d.rule,
        })
        .collect();
    serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Form Forge WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no editor needed) ─────────────────────────────

/// Validate a bare node array. Returns JSON
/// `{"ok":bool,"diagnostics":[...]}` or `{"ok":false,"error":"..."}`.
/// `ok` is false when any finding is an error.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    match parse_tree_json(json) {
        Ok(tree) => {
            let diags = lint_document(&tree);
            let ok = !ff_core::has_errors(&diags);
            format!(r#"{{"ok":{ok},"diagnostics":{}}}"#, diagnostics_json(&diags))
        }
        Err(e) => serde_json::json!({ "ok": false, "error": e }).to_string(),
    }
}

/// Re-emit a bare node array in canonical form: every container carries an
/// explicit children list. Returns an empty string on bad input.
#[wasm_bindgen]
pub fn normalize(json: &str) -> String {
    parse_tree_json(json)
        .map(|tree| normalize_containers(&tree))
        .and_then(|tree| tree_to_json(&tree))
        .unwrap_or_default()
}
