//! Deep copies with regenerated identity, used by paste / duplicate /
//! snapshots so copied content never aliases IDs with the live document.

use crate::id::NodeId;
use crate::model::{ComponentTree, Node};
use std::sync::Arc;

/// Deep-copy `node` and every descendant, giving each a fresh ID.
/// Kind, properties, and child order are preserved.
#[must_use]
pub fn clone_with_new_identity(node: &Node) -> Node {
    Node {
        id: NodeId::fresh(node.kind.spec().id_prefix),
        kind: node.kind,
        properties: node.properties.clone(),
        children: node.children.as_ref().map(|children| {
            children
                .iter()
                .map(|child| Arc::new(clone_with_new_identity(child)))
                .collect()
        }),
    }
}

/// Clone a whole tree with fresh IDs throughout.
#[must_use]
pub fn clone_tree_with_new_identity(tree: &ComponentTree) -> ComponentTree {
    ComponentTree {
        nodes: tree
            .nodes
            .iter()
            .map(|n| Arc::new(clone_with_new_identity(n)))
            .collect(),
    }
}
