//! Document state and the intent surface.
//!
//! `DocumentState` owns the current tree, its history, the selection, the
//! clipboard and the user's named snapshots. Every mutating intent either
//! commits exactly one `(tree, HistoryEntry)` pair or leaves the state
//! untouched and returns `false` / `None`. Nothing here panics or surfaces an
//! error for a refused edit: the UI action simply has no effect.

use crate::clipboard::{Clipboard, top_most};
use crate::config::EditorConfig;
use crate::history::{History, HistoryEntry};
use crate::shortcuts::ShortcutAction;
use ff_core::ops::{self, OpError};
use ff_core::persist::normalize_containers;
use ff_core::{
    ComponentInsert, ComponentTree, LintSeverity, Location, NamedSnapshot, Node, NodeId,
    NodeKind, PersistedDocument, Properties, clone_tree_with_new_identity,
    clone_with_new_identity, has_errors, lint_document,
};
use smallvec::SmallVec;
use std::collections::HashSet;
use std::sync::Arc;

/// Selected component IDs, in selection order.
pub type Selection = SmallVec<[NodeId; 4]>;

#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    tree: ComponentTree,
    history: History,
    selection: Selection,
    clipboard: Clipboard,
    snapshots: Vec<NamedSnapshot>,
    config: EditorConfig,
}

impl DocumentState {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            history: History::new(config.history_limit),
            config,
            ..Self::default()
        }
    }

    // ─── Read surface ─────────────────────────────────────────────────────

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── Structural intents ───────────────────────────────────────────────

    /// Create a component of `kind` with its default properties and insert it
    /// under `parent` (None = top level) at `index` (None = append).
    ///
    /// Returns the new component's ID.
    pub fn add_node(
        &mut self,
        kind: NodeKind,
        parent: Option<NodeId>,
        index: Option<usize>,
    ) -> Option<NodeId> {
        let node = Arc::new(Node::create(kind));
        let id = node.id;
        let requested = Location {
            parent_id: parent,
            index: index.unwrap_or(usize::MAX),
        };

        let inserted = match ops::insert(&self.tree, Arc::clone(&node), requested) {
            Ok(inserted) => inserted,
            Err(err) if self.config.fallback_to_root && parent.is_some() => {
                log::debug!("add {kind}: {err}, appending at top level");
                match ops::insert(&self.tree, Arc::clone(&node), Location::root(usize::MAX)) {
                    Ok(inserted) => inserted,
                    Err(err) => return refused("add", err),
                }
            }
            Err(err) => return refused("add", err),
        };

        let location = inserted.location;
        self.commit(
            inserted.tree,
            HistoryEntry::Insert {
                inserts: vec![ComponentInsert { node, location }],
            },
        );
        if self.config.select_inserted {
            self.selection = smallvec::smallvec![id];
        }
        Some(id)
    }

    /// Re-parent or reorder a component. `index` addresses the destination
    /// list with the component already detached; `None` appends.
    pub fn move_node(&mut self, id: NodeId, parent: Option<NodeId>, index: Option<usize>) -> bool {
        let target = Location {
            parent_id: parent,
            index: index.unwrap_or(usize::MAX),
        };
        match ops::move_node(&self.tree, id, target) {
            Ok(moved) if moved.from == moved.to => false,
            Ok(moved) => {
                self.commit(
                    moved.tree,
                    HistoryEntry::Move {
                        target_id: id,
                        from: moved.from,
                        to: moved.to,
                    },
                );
                true
            }
            Err(err) => refused("move", err),
        }
    }

    /// Drag-to-reorder: move `active` into the slot currently held by `over`.
    /// Both must share a parent.
    pub fn reorder_siblings(&mut self, active: NodeId, over: NodeId) -> bool {
        if active == over {
            return false;
        }
        let (Some(from), Some(to)) = (
            self.tree.find_parent_info(active),
            self.tree.find_parent_info(over),
        ) else {
            return false;
        };
        if from.parent_id != to.parent_id {
            log::debug!("reorder {active} over {over}: not siblings");
            return false;
        }
        self.move_node(active, to.parent_id, Some(to.index))
    }

    /// Remove every listed component (and its subtree) as one edit.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> bool {
        let set: HashSet<NodeId> = ids.iter().copied().collect();
        let removed = ops::remove_by_ids(&self.tree, &set);
        if removed.removed.is_empty() {
            return false;
        }
        self.commit(
            removed.tree,
            HistoryEntry::Delete {
                removes: removed.removed,
            },
        );
        self.prune_selection();
        true
    }

    /// Shallow-merge `patch` into the component's properties. A patch that
    /// changes nothing is not recorded.
    pub fn update_properties(&mut self, id: NodeId, patch: Properties) -> bool {
        let Some(node) = self.tree.find_by_id(id) else {
            log::warn!("update properties: component `{id}` not found");
            return false;
        };
        let mut next = node.properties.clone();
        next.extend(patch);
        if next == node.properties {
            return false;
        }
        match ops::replace_properties(&self.tree, id, next.clone()) {
            Ok(replaced) => {
                self.commit(
                    replaced.tree,
                    HistoryEntry::UpdateProps {
                        target_id: id,
                        prev_properties: replaced.prev_properties,
                        next_properties: next,
                    },
                );
                true
            }
            Err(err) => refused("update properties", err),
        }
    }

    // ─── Clipboard intents ────────────────────────────────────────────────

    /// Capture the selected subtrees. Returns how many were captured.
    pub fn copy(&mut self) -> usize {
        self.clipboard.copy_from(&self.tree, &self.selection)
    }

    /// Insert fresh-identity copies of the clipboard right after the last
    /// selected component, or at the end of the top-level list.
    pub fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        let anchor = self
            .selection
            .iter()
            .rev()
            .find_map(|id| self.tree.find_parent_info(*id))
            .map(|loc| Location {
                index: loc.index + 1,
                ..loc
            })
            .unwrap_or(Location::root(self.tree.len()));

        let clones = self.clipboard.materialize();
        let ids: Vec<NodeId> = clones.iter().map(|n| n.id).collect();
        let mut working = self.tree.clone();
        for (offset, node) in clones.into_iter().enumerate() {
            let location = Location {
                index: anchor.index + offset,
                ..anchor
            };
            working = match ops::insert(&working, node, location) {
                Ok(inserted) => inserted.tree,
                Err(err) => return refused("paste", err),
            };
        }
        self.commit_inserts("paste", working, &ids)
    }

    /// Insert a fresh-identity copy of each top-most selected component
    /// directly after its original.
    pub fn duplicate(&mut self) -> bool {
        let originals: Vec<Arc<Node>> = top_most(&self.tree, &self.selection)
            .into_iter()
            .cloned()
            .collect();
        if originals.is_empty() {
            return false;
        }

        let mut ids = Vec::with_capacity(originals.len());
        let mut working = self.tree.clone();
        for original in &originals {
            let Some(at) = working.find_parent_info(original.id) else {
                return refused("duplicate", OpError::NotFound(original.id));
            };
            let copy = Arc::new(clone_with_new_identity(original));
            ids.push(copy.id);
            let location = Location {
                index: at.index + 1,
                ..at
            };
            working = match ops::insert(&working, copy, location) {
                Ok(inserted) => inserted.tree,
                Err(err) => return refused("duplicate", err),
            };
        }
        self.commit_inserts("duplicate", working, &ids)
    }

    /// Copy the selection, then remove it as one delete edit.
    pub fn cut(&mut self) -> bool {
        if self.copy() == 0 {
            return false;
        }
        let ids: Vec<NodeId> = self.selection.to_vec();
        self.remove_nodes(&ids)
    }

    // ─── History intents ──────────────────────────────────────────────────

    /// Returns the undone entry's label. Clears the selection.
    pub fn undo(&mut self) -> Option<&'static str> {
        let (tree, label) = self.history.undo(&self.tree)?;
        log::debug!("undo {label}");
        self.tree = tree;
        self.selection.clear();
        Some(label)
    }

    /// Returns the redone entry's label. Clears the selection.
    pub fn redo(&mut self) -> Option<&'static str> {
        let (tree, label) = self.history.redo(&self.tree)?;
        log::debug!("redo {label}");
        self.tree = tree;
        self.selection.clear();
        Some(label)
    }

    // ─── Whole-document intents ───────────────────────────────────────────

    /// Replace the whole document (import). Content that fails lint with an
    /// `Error` finding is refused; an identical document is not recorded.
    pub fn replace_document(&mut self, tree: ComponentTree) -> bool {
        self.checked_replace("replace document", &tree)
    }

    /// Clear the document. Undoable.
    pub fn reset_document(&mut self) -> bool {
        self.replace_all(ComponentTree::new())
    }

    /// Adopt a persisted document without recording history. History,
    /// selection and clipboard start over. The tree and every snapshot are
    /// normalized and linted first.
    ///
    /// # Errors
    /// Returns the lint messages if the tree or any snapshot breaks a tree
    /// invariant. The state is left untouched.
    pub fn load(&mut self, doc: PersistedDocument) -> Result<(), String> {
        let tree = checked(&doc.nodes)?;
        let snapshots = doc
            .snapshots
            .into_iter()
            .map(|s| {
                let nodes =
                    checked(&s.nodes).map_err(|e| format!("snapshot `{}`: {e}", s.name))?;
                Ok(NamedSnapshot {
                    name: s.name,
                    nodes,
                })
            })
            .collect::<Result<Vec<_>, String>>()?;
        self.tree = tree;
        self.snapshots = snapshots;
        self.history.clear();
        self.selection.clear();
        self.clipboard.clear();
        log::debug!("loaded document with {} components", self.tree.count_nodes());
        Ok(())
    }

    /// The persistable part of the state: tree and named snapshots.
    pub fn to_persisted(&self) -> PersistedDocument {
        PersistedDocument::new(self.tree.clone(), self.snapshots.clone())
    }

    // ─── Named snapshots ──────────────────────────────────────────────────

    /// Save a fresh-identity copy of the document under `name`, replacing any
    /// snapshot with the same name. Not an edit; nothing is recorded.
    pub fn save_snapshot(&mut self, name: &str) {
        let snapshot = NamedSnapshot {
            name: name.to_string(),
            nodes: clone_tree_with_new_identity(&self.tree),
        };
        match self.snapshots.iter_mut().find(|s| s.name == name) {
            Some(existing) => *existing = snapshot,
            None => self.snapshots.push(snapshot),
        }
    }

    /// Replace the document with a fresh-identity copy of the named snapshot.
    /// Recorded as a whole-document replacement.
    pub fn restore_snapshot(&mut self, name: &str) -> bool {
        let Some(snapshot) = self.snapshots.iter().find(|s| s.name == name) else {
            log::warn!("restore snapshot: no snapshot named `{name}`");
            return false;
        };
        let tree = clone_tree_with_new_identity(&snapshot.nodes);
        self.checked_replace("restore snapshot", &tree)
    }

    pub fn delete_snapshot(&mut self, name: &str) -> bool {
        let before = self.snapshots.len();
        self.snapshots.retain(|s| s.name != name);
        self.snapshots.len() != before
    }

    pub fn snapshots(&self) -> &[NamedSnapshot] {
        &self.snapshots
    }

    // ─── Selection ────────────────────────────────────────────────────────

    /// Select the listed components. Unknown and repeated IDs are skipped.
    pub fn select(&mut self, ids: &[NodeId]) {
        self.selection.clear();
        for id in ids {
            if self.tree.contains(*id) && !self.selection.contains(id) {
                self.selection.push(*id);
            }
        }
    }

    /// Select every top-level component.
    pub fn select_all(&mut self) {
        self.selection = self.tree.nodes.iter().map(|n| n.id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ─── Shortcuts ────────────────────────────────────────────────────────

    /// Run the intent bound to a shortcut. Returns whether anything changed.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::Undo => self.undo().is_some(),
            ShortcutAction::Redo => self.redo().is_some(),
            ShortcutAction::Delete => {
                let ids = self.selection.to_vec();
                self.remove_nodes(&ids)
            }
            ShortcutAction::Duplicate => self.duplicate(),
            ShortcutAction::Copy => self.copy() > 0,
            ShortcutAction::Cut => self.cut(),
            ShortcutAction::Paste => self.paste(),
            ShortcutAction::ClearAll => self.reset_document(),
            ShortcutAction::MoveUp => self.nudge_selected(-1),
            ShortcutAction::MoveDown => self.nudge_selected(1),
            ShortcutAction::SelectAll => {
                self.select_all();
                !self.selection.is_empty()
            }
            ShortcutAction::Deselect => {
                let had = !self.selection.is_empty();
                self.selection.clear();
                had
            }
        }
    }

    /// Shift a single selected component one slot among its siblings.
    fn nudge_selected(&mut self, step: isize) -> bool {
        let [id] = self.selection.as_slice() else {
            return false;
        };
        let id = *id;
        let Some(at) = self.tree.find_parent_info(id) else {
            return false;
        };
        let Some(index) = at.index.checked_add_signed(step) else {
            return false;
        };
        self.move_node(id, at.parent_id, Some(index))
    }

    // ─── Internals ────────────────────────────────────────────────────────

    fn commit(&mut self, tree: ComponentTree, entry: HistoryEntry) {
        log::debug!("commit {}", entry.label());
        self.tree = tree;
        self.history.record(entry);
    }

    /// Record a batch of fresh components at their final positions in
    /// `working`, then adopt it.
    fn commit_inserts(&mut self, what: &str, working: ComponentTree, ids: &[NodeId]) -> bool {
        let inserts = match settled_inserts(&working, ids) {
            Ok(inserts) => inserts,
            Err(err) => return refused(what, err),
        };
        self.commit(working, HistoryEntry::Insert { inserts });
        if self.config.select_inserted {
            self.selection = ids.iter().copied().collect();
        }
        true
    }

    /// Whole-document replacement behind the normalize + lint gate.
    fn checked_replace(&mut self, what: &str, tree: &ComponentTree) -> bool {
        match checked(tree) {
            Ok(tree) => self.replace_all(tree),
            Err(e) => {
                log::warn!("{what} refused: {e}");
                false
            }
        }
    }

    fn replace_all(&mut self, tree: ComponentTree) -> bool {
        if tree == self.tree {
            return false;
        }
        let entry = HistoryEntry::ReplaceAll {
            removes: top_level_records(&self.tree),
            inserts: top_level_records(&tree),
        };
        self.commit(tree, entry);
        self.selection.clear();
        true
    }

    fn prune_selection(&mut self) {
        let tree = &self.tree;
        self.selection.retain(|id| tree.contains(*id));
    }
}

/// Log a refused edit and produce the intent's "nothing happened" value.
fn refused<T: Default>(what: &str, err: OpError) -> T {
    log::warn!("{what} refused: {err}");
    T::default()
}

/// Normalized copy of `tree`, or its `Error` lint messages.
fn checked(tree: &ComponentTree) -> Result<ComponentTree, String> {
    let tree = normalize_containers(tree);
    let diags = lint_document(&tree);
    if !has_errors(&diags) {
        return Ok(tree);
    }
    let messages: Vec<String> = diags
        .iter()
        .filter(|d| d.severity == LintSeverity::Error)
        .map(|d| format!("{} ({})", d.message, d.rule))
        .collect();
    Err(messages.join("\n"))
}

/// Where each of `ids` ended up in `tree`.
fn settled_inserts(tree: &ComponentTree, ids: &[NodeId]) -> Result<Vec<ComponentInsert>, OpError> {
    ids.iter()
        .map(|id| {
            let node = tree.find_by_id(*id).ok_or(OpError::NotFound(*id))?;
            let location = tree.find_parent_info(*id).ok_or(OpError::NotFound(*id))?;
            Ok(ComponentInsert {
                node: Arc::clone(node),
                location,
            })
        })
        .collect()
}

fn top_level_records(tree: &ComponentTree) -> Vec<ComponentInsert> {
    tree.nodes
        .iter()
        .enumerate()
        .map(|(index, node)| ComponentInsert {
            node: Arc::clone(node),
            location: Location::root(index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn ids(state: &DocumentState) -> Vec<&str> {
        state.tree().nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn patch(key: &str, value: serde_json::Value) -> Properties {
        [(key.to_string(), value)].into_iter().collect()
    }

    #[test]
    fn add_appends_and_selects() {
        let mut doc = DocumentState::new();
        let a = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        let b = doc.add_node(NodeKind::Checkbox, None, None).unwrap();
        assert_eq!(ids(&doc), vec![a.as_str(), b.as_str()]);
        assert_eq!(doc.selection(), &[b]);
        assert_eq!(doc.history().undo_depth(), 2);
    }

    #[test]
    fn add_into_leaf_falls_back_to_root() {
        let mut doc = DocumentState::new();
        let leaf = doc.add_node(NodeKind::Button, None, None).unwrap();
        let added = doc.add_node(NodeKind::TextInput, Some(leaf), Some(0)).unwrap();
        assert_eq!(doc.tree().nodes[1].id, added);
    }

    #[test]
    fn add_into_leaf_without_fallback_is_refused() {
        let mut doc = DocumentState::with_config(EditorConfig {
            fallback_to_root: false,
            ..EditorConfig::default()
        });
        let leaf = doc.add_node(NodeKind::Button, None, None).unwrap();
        assert_eq!(doc.add_node(NodeKind::TextInput, Some(leaf), Some(0)), None);
        assert_eq!(doc.tree().count_nodes(), 1);
        assert_eq!(doc.history().undo_depth(), 1);
    }

    #[test]
    fn move_to_same_slot_is_not_recorded() {
        let mut doc = DocumentState::new();
        let a = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        doc.add_node(NodeKind::TextInput, None, None).unwrap();
        assert!(!doc.move_node(a, None, Some(0)));
        assert_eq!(doc.history().undo_depth(), 2);
    }

    #[test]
    fn reorder_siblings_takes_over_slot() {
        let mut doc = DocumentState::new();
        let a = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        let b = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        let c = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        assert!(doc.reorder_siblings(a, c));
        assert_eq!(ids(&doc), vec![b.as_str(), c.as_str(), a.as_str()]);
        assert!(doc.reorder_siblings(a, b));
        assert_eq!(ids(&doc), vec![a.as_str(), b.as_str(), c.as_str()]);
    }

    #[test]
    fn reorder_across_parents_is_refused() {
        let mut doc = DocumentState::new();
        let group = doc.add_node(NodeKind::Container, None, None).unwrap();
        let inner = doc.add_node(NodeKind::TextInput, Some(group), None).unwrap();
        let outer = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        assert!(!doc.reorder_siblings(inner, outer));
    }

    #[test]
    fn noop_patch_is_not_recorded() {
        let mut doc = DocumentState::new();
        let id = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        assert!(doc.update_properties(id, patch("label", json!("Name"))));
        assert!(!doc.update_properties(id, patch("label", json!("Name"))));
        assert_eq!(doc.history().undo_depth(), 2);
    }

    #[test]
    fn patch_merges_shallowly() {
        let mut doc = DocumentState::new();
        let id = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        doc.update_properties(id, patch("label", json!("Email")));
        doc.update_properties(id, patch("required", json!(true)));
        let props = &doc.tree().find_by_id(id).unwrap().properties;
        assert_eq!(props["label"], json!("Email"));
        assert_eq!(props["required"], json!(true));
    }

    #[test]
    fn remove_prunes_selection() {
        let mut doc = DocumentState::new();
        let a = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        let b = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        doc.select(&[a, b]);
        assert!(doc.remove_nodes(&[a]));
        assert_eq!(doc.selection(), &[b]);
        assert!(!doc.remove_nodes(&[a]), "already gone");
    }

    #[test]
    fn undo_clears_selection() {
        let mut doc = DocumentState::new();
        doc.add_node(NodeKind::TextInput, None, None).unwrap();
        assert_eq!(doc.undo(), Some("insert"));
        assert!(doc.selection().is_empty());
        assert!(doc.tree().is_empty());
        assert_eq!(doc.redo(), Some("insert"));
        assert_eq!(doc.tree().len(), 1);
    }

    #[test]
    fn select_skips_unknown_and_repeated() {
        let mut doc = DocumentState::new();
        let a = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        doc.select(&[a, NodeId::intern("doc_unknown"), a]);
        assert_eq!(doc.selection(), &[a]);
    }

    #[test]
    fn reset_and_undo_restores_document() {
        let mut doc = DocumentState::new();
        doc.add_node(NodeKind::Heading, None, None).unwrap();
        doc.add_node(NodeKind::TextInput, None, None).unwrap();
        let before = doc.tree().clone();
        assert!(doc.reset_document());
        assert!(doc.tree().is_empty());
        assert!(!doc.reset_document(), "already empty");
        assert_eq!(doc.undo(), Some("replace document"));
        assert_eq!(doc.tree(), &before);
    }

    #[test]
    fn replace_document_refuses_duplicate_ids() {
        let mut doc = DocumentState::new();
        let dup = NodeId::intern("doc_dup");
        let bad = ComponentTree::from_nodes(vec![
            Node::new(dup, NodeKind::TextInput),
            Node::new(dup, NodeKind::TextInput),
        ]);
        assert!(!doc.replace_document(bad));
        assert!(!doc.can_undo());
    }

    #[test]
    fn snapshots_restore_with_fresh_ids() {
        let mut doc = DocumentState::new();
        let original = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        doc.save_snapshot("v1");
        doc.reset_document();
        assert!(doc.restore_snapshot("v1"));
        assert_eq!(doc.tree().len(), 1);
        assert_ne!(doc.tree().nodes[0].id, original);
        assert_eq!(doc.tree().nodes[0].kind, NodeKind::TextInput);
        assert!(!doc.restore_snapshot("missing"));
        assert!(doc.delete_snapshot("v1"));
        assert!(doc.snapshots().is_empty());
    }

    fn button_with_child() -> ComponentTree {
        ComponentTree::from_nodes(vec![
            Node::create(NodeKind::Button)
                .with_children(vec![Node::create(NodeKind::TextInput)]),
        ])
    }

    #[test]
    fn load_rejects_snapshot_with_leaf_children() {
        let mut doc = DocumentState::new();
        let kept = doc.add_node(NodeKind::Heading, None, None).unwrap();
        let persisted = PersistedDocument::new(
            ComponentTree::new(),
            vec![NamedSnapshot {
                name: "bad".to_string(),
                nodes: button_with_child(),
            }],
        );
        let err = doc.load(persisted).unwrap_err();
        assert!(err.contains("snapshot `bad`"), "{err}");
        assert!(err.contains("children-on-leaf"), "{err}");
        assert_eq!(doc.tree().nodes[0].id, kept);
        assert!(doc.snapshots().is_empty());
    }

    #[test]
    fn restore_snapshot_goes_through_lint() {
        let mut doc = DocumentState::new();
        doc.add_node(NodeKind::Heading, None, None).unwrap();
        let before = doc.tree().clone();
        doc.snapshots.push(NamedSnapshot {
            name: "bad".to_string(),
            nodes: button_with_child(),
        });
        assert!(!doc.restore_snapshot("bad"));
        assert_eq!(doc.tree(), &before);
        assert!(!has_errors(&lint_document(doc.tree())));
        assert_eq!(doc.history().undo_depth(), 1);
    }

    #[test]
    fn load_normalizes_bare_containers() {
        let bare = Node {
            children: None,
            ..Node::new(NodeId::intern("doc_bare_group"), NodeKind::Container)
        };
        let snapshot = NamedSnapshot {
            name: "bare".to_string(),
            nodes: ComponentTree::from_nodes(vec![bare.clone()]),
        };
        let mut doc = DocumentState::new();
        doc.load(PersistedDocument::new(
            ComponentTree::from_nodes(vec![bare]),
            vec![snapshot],
        ))
        .unwrap();
        assert_eq!(doc.tree().nodes[0].children, Some(Vec::new()));
        assert_eq!(doc.snapshots()[0].nodes.nodes[0].children, Some(Vec::new()));
    }

    #[test]
    fn load_skips_history() {
        let mut doc = DocumentState::new();
        doc.add_node(NodeKind::TextInput, None, None).unwrap();
        let persisted = doc.to_persisted();

        let mut other = DocumentState::new();
        other.load(persisted).unwrap();
        assert_eq!(other.tree(), doc.tree());
        assert!(!other.can_undo());
    }

    #[test]
    fn dispatch_nudges_single_selection() {
        let mut doc = DocumentState::new();
        let a = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        let b = doc.add_node(NodeKind::TextInput, None, None).unwrap();
        doc.select(&[b]);
        assert!(doc.dispatch(ShortcutAction::MoveUp));
        assert_eq!(ids(&doc), vec![b.as_str(), a.as_str()]);
        assert!(!doc.dispatch(ShortcutAction::MoveUp), "already first");
        assert!(doc.dispatch(ShortcutAction::MoveDown));
        assert!(!doc.dispatch(ShortcutAction::MoveDown), "already last");
    }

    #[test]
    fn dispatch_select_and_deselect() {
        let mut doc = DocumentState::new();
        doc.add_node(NodeKind::TextInput, None, None).unwrap();
        doc.add_node(NodeKind::TextInput, None, None).unwrap();
        assert!(doc.dispatch(ShortcutAction::SelectAll));
        assert_eq!(doc.selection().len(), 2);
        assert!(doc.dispatch(ShortcutAction::Deselect));
        assert!(!doc.dispatch(ShortcutAction::Deselect));
    }
}
