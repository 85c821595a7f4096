//! Read-only queries over a `ComponentTree`.
//!
//! All lookups are depth-first in document order and stop at the first
//! match, which is well-defined because IDs are unique document-wide.

use crate::id::NodeId;
use crate::model::{ComponentTree, Location, Node};
use std::collections::HashSet;
use std::sync::Arc;

impl ComponentTree {
    /// Find a component anywhere in the tree.
    pub fn find_by_id(&self, id: NodeId) -> Option<&Arc<Node>> {
        find_in(&self.nodes, id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Where a component currently sits: its parent (None = top level) and
    /// its index among that parent's children.
    pub fn find_parent_info(&self, id: NodeId) -> Option<Location> {
        if let Some(index) = self.nodes.iter().position(|n| n.id == id) {
            return Some(Location::root(index));
        }
        parent_info_in(&self.nodes, id)
    }

    /// Whether `candidate` lives strictly inside the subtree rooted at
    /// `ancestor`. A node is never its own descendant.
    pub fn is_descendant(&self, ancestor: NodeId, candidate: NodeId) -> bool {
        match self.find_by_id(ancestor) {
            Some(node) => find_in(node.child_nodes(), candidate).is_some(),
            None => false,
        }
    }

    /// The child list addressed by `parent` (None = top level). Returns
    /// `None` if the parent is missing or is not a container.
    pub fn children_of(&self, parent: Option<NodeId>) -> Option<&[Arc<Node>]> {
        match parent {
            None => Some(&self.nodes),
            Some(pid) => self.find_by_id(pid)?.children.as_deref(),
        }
    }

    /// Every component in pre-order (document / tab order).
    pub fn flatten(&self) -> Vec<&Arc<Node>> {
        let mut out = Vec::new();
        flatten_into(&self.nodes, &mut out);
        out
    }

    /// Total number of components, nested ones included.
    pub fn count_nodes(&self) -> usize {
        count_in(&self.nodes)
    }

    /// All IDs in the document.
    pub fn collect_ids(&self) -> HashSet<NodeId> {
        self.flatten().into_iter().map(|n| n.id).collect()
    }
}

fn find_in(nodes: &[Arc<Node>], id: NodeId) -> Option<&Arc<Node>> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.child_nodes(), id) {
            return Some(found);
        }
    }
    None
}

fn parent_info_in(nodes: &[Arc<Node>], id: NodeId) -> Option<Location> {
    for node in nodes {
        let children = node.child_nodes();
        if let Some(index) = children.iter().position(|c| c.id == id) {
            return Some(Location::child_of(node.id, index));
        }
        if let Some(found) = parent_info_in(children, id) {
            return Some(found);
        }
    }
    None
}

fn flatten_into<'a>(nodes: &'a [Arc<Node>], out: &mut Vec<&'a Arc<Node>>) {
    for node in nodes {
        out.push(node);
        flatten_into(node.child_nodes(), out);
    }
}

fn count_in(nodes: &[Arc<Node>]) -> usize {
    nodes.iter().map(|n| 1 + count_in(n.child_nodes())).sum()
}
