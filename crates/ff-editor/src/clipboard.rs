//! Copy buffer for paste / duplicate / cut.
//!
//! Copying only takes references to the selected subtrees; identities are
//! regenerated when the content is materialized for insertion.

use ff_core::{ComponentTree, Node, NodeId, clone_with_new_identity};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    entries: Vec<Arc<Node>>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with the top-most of `ids` found in `tree`, in
    /// document order. Returns how many subtrees were captured; an empty
    /// capture leaves the previous content untouched.
    pub fn copy_from(&mut self, tree: &ComponentTree, ids: &[NodeId]) -> usize {
        let captured: Vec<Arc<Node>> = top_most(tree, ids).into_iter().cloned().collect();
        if captured.is_empty() {
            return 0;
        }
        self.entries = captured;
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The buffered subtrees as they were at copy time.
    pub fn entries(&self) -> &[Arc<Node>] {
        &self.entries
    }

    /// Fresh-identity copies of the buffer, ready to insert.
    pub fn materialize(&self) -> Vec<Arc<Node>> {
        self.entries
            .iter()
            .map(|node| Arc::new(clone_with_new_identity(node)))
            .collect()
    }
}

/// Nodes in `ids` that have no ancestor also in `ids`, in document order.
/// Unknown IDs are ignored.
pub fn top_most<'a>(tree: &'a ComponentTree, ids: &[NodeId]) -> Vec<&'a Arc<Node>> {
    let wanted: HashSet<NodeId> = ids.iter().copied().collect();
    let mut out = Vec::new();
    collect_top_most(&tree.nodes, &wanted, &mut out);
    out
}

fn collect_top_most<'a>(
    nodes: &'a [Arc<Node>],
    wanted: &HashSet<NodeId>,
    out: &mut Vec<&'a Arc<Node>>,
) {
    for node in nodes {
        if wanted.contains(&node.id) {
            out.push(node);
        } else {
            collect_top_most(node.child_nodes(), wanted, out);
        }
    }
}
