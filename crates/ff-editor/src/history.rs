//! Undo/Redo history.
//!
//! Every committed edit is recorded as a [`HistoryEntry`] describing the
//! structural delta, not a snapshot of the document. Undo inverts the entry
//! against the current tree; redo re-applies it. Whole-document replacement
//! (import, clear, snapshot restore) is the one case with no meaningful small
//! delta and is kept as its own variant.
//!
//! ```text
//! record(e3)            past: [e1, e2, e3]   future: []
//! undo() x2             past: [e1]           future: [e3, e2]
//! record(e4)            past: [e1, e4]       future: []   <- new branch
//! ```

use ff_core::ops::{self, OpError};
use ff_core::{ComponentInsert, ComponentTree, Location, NodeId, Properties};
use std::collections::{HashSet, VecDeque};

/// Default maximum number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A recorded, invertible description of one committed edit.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// One or more subtrees were added. Locations are where they sit in the
    /// tree right after the edit.
    Insert { inserts: Vec<ComponentInsert> },
    /// One or more subtrees were removed. Locations are relative to the tree
    /// right before the edit.
    Delete { removes: Vec<ComponentInsert> },
    UpdateProps {
        target_id: NodeId,
        prev_properties: Properties,
        next_properties: Properties,
    },
    Move {
        target_id: NodeId,
        from: Location,
        to: Location,
    },
    /// Whole-document replacement: `removes` is the old top-level list,
    /// `inserts` the new one.
    ReplaceAll {
        removes: Vec<ComponentInsert>,
        inserts: Vec<ComponentInsert>,
    },
}

impl HistoryEntry {
    /// Short description, returned by undo/redo.
    pub fn label(&self) -> &'static str {
        match self {
            HistoryEntry::Insert { .. } => "insert",
            HistoryEntry::Delete { .. } => "delete",
            HistoryEntry::UpdateProps { .. } => "update properties",
            HistoryEntry::Move { .. } => "move",
            HistoryEntry::ReplaceAll { .. } => "replace document",
        }
    }

    /// Re-execute the forward direction of this entry against `tree`.
    ///
    /// # Errors
    /// Fails closed (returning the first refused operation) if the entry
    /// can't be resolved against `tree`; nothing is partially applied.
    pub fn apply(&self, tree: &ComponentTree) -> Result<ComponentTree, OpError> {
        match self {
            HistoryEntry::Insert { inserts } => insert_all(tree, inserts),
            HistoryEntry::Delete { removes } => remove_all(tree, removes),
            HistoryEntry::UpdateProps {
                target_id,
                next_properties,
                ..
            } => ops::replace_properties(tree, *target_id, next_properties.clone())
                .map(|r| r.tree),
            HistoryEntry::Move { target_id, to, .. } => {
                ops::move_node(tree, *target_id, *to).map(|m| m.tree)
            }
            HistoryEntry::ReplaceAll { inserts, .. } => rebuild(inserts),
        }
    }

    /// Execute the backward direction of this entry against `tree`.
    ///
    /// # Errors
    /// Same fail-closed policy as [`HistoryEntry::apply`].
    pub fn invert(&self, tree: &ComponentTree) -> Result<ComponentTree, OpError> {
        match self {
            HistoryEntry::Insert { inserts } => remove_all(tree, inserts),
            HistoryEntry::Delete { removes } => insert_all(tree, removes),
            HistoryEntry::UpdateProps {
                target_id,
                prev_properties,
                ..
            } => ops::replace_properties(tree, *target_id, prev_properties.clone())
                .map(|r| r.tree),
            HistoryEntry::Move {
                target_id, from, ..
            } => ops::move_node(tree, *target_id, *from).map(|m| m.tree),
            HistoryEntry::ReplaceAll { removes, .. } => rebuild(removes),
        }
    }
}

/// Re-insert recorded subtrees, ordered by parent then index so earlier
/// insertions never shift the target index of later ones.
fn insert_all(
    tree: &ComponentTree,
    records: &[ComponentInsert],
) -> Result<ComponentTree, OpError> {
    let mut ordered: Vec<&ComponentInsert> = records.iter().collect();
    ordered.sort_by_key(|r| (r.location.parent_id, r.location.index));

    let mut present = tree.collect_ids();
    let mut current = tree.clone();
    for record in ordered {
        let subtree = ComponentTree {
            nodes: vec![record.node.clone()],
        };
        for node in subtree.flatten() {
            if !present.insert(node.id) {
                return Err(OpError::DuplicateId(node.id));
            }
        }
        current = ops::insert(&current, record.node.clone(), record.location)?.tree;
    }
    Ok(current)
}

/// Remove the recorded subtrees; every one of them must still be present.
fn remove_all(
    tree: &ComponentTree,
    records: &[ComponentInsert],
) -> Result<ComponentTree, OpError> {
    let ids: HashSet<NodeId> = records.iter().map(|r| r.node.id).collect();
    if let Some(missing) = ids.iter().find(|id| !tree.contains(**id)) {
        return Err(OpError::NotFound(*missing));
    }
    Ok(ops::remove_by_ids(tree, &ids).tree)
}

/// Build a fresh document from a recorded top-level list.
fn rebuild(records: &[ComponentInsert]) -> Result<ComponentTree, OpError> {
    insert_all(&ComponentTree::new(), records)
}

// ─── Stacks ───────────────────────────────────────────────────────────────

/// Bounded undo / redo stacks.
///
/// `past` is capped at `max_depth`; the oldest entries are dropped first,
/// which permanently limits how far back undo can go.
#[derive(Debug, Clone)]
pub struct History {
    /// Oldest at the front, newest at the back.
    past: VecDeque<HistoryEntry>,
    /// Most recently undone at the back.
    future: Vec<HistoryEntry>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(max_depth.min(DEFAULT_HISTORY_LIMIT)),
            future: Vec::new(),
            max_depth,
        }
    }

    /// Record a committed edit. Clears the redo stack.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.future.clear();
        self.push_past(entry);
    }

    /// Pop the newest entry and invert it against `tree`.
    ///
    /// Returns the new tree and the entry's label, or `None` when there is
    /// nothing to undo or the entry no longer resolves (it then stays put).
    pub fn undo(&mut self, tree: &ComponentTree) -> Option<(ComponentTree, &'static str)> {
        let entry = self.past.pop_back()?;
        match entry.invert(tree) {
            Ok(next) => {
                let label = entry.label();
                self.future.push(entry);
                Some((next, label))
            }
            Err(err) => {
                log::warn!("undo {} failed: {err}", entry.label());
                self.past.push_back(entry);
                None
            }
        }
    }

    /// Pop the most recently undone entry and re-apply it to `tree`.
    pub fn redo(&mut self, tree: &ComponentTree) -> Option<(ComponentTree, &'static str)> {
        let entry = self.future.pop()?;
        match entry.apply(tree) {
            Ok(next) => {
                let label = entry.label();
                self.push_past(entry);
                Some((next, label))
            }
            Err(err) => {
                log::warn!("redo {} failed: {err}", entry.label());
                self.future.push(entry);
                None
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Newest entry, if any.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.past.back()
    }

    /// Entries available for undo, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.past.iter()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn push_past(&mut self, entry: HistoryEntry) {
        self.past.push_back(entry);
        while self.past.len() > self.max_depth {
            if let Some(evicted) = self.past.pop_front() {
                log::debug!("history full, dropped oldest {}", evicted.label());
            }
        }
    }
}
