//! Pure structural operations over a `ComponentTree`.
//!
//! Every operation takes the current tree by reference and returns a new
//! tree plus the delta needed to reverse it. Only the nodes on the path from
//! the root list to the edited slot are rebuilt; all other subtrees are
//! shared (`Arc`) with the input, which is never mutated.

use crate::id::NodeId;
use crate::model::{ComponentInsert, ComponentTree, Location, Node, Properties};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

// ─── Errors ───────────────────────────────────────────────────────────────

/// Why a structural operation was refused. The input tree is unchanged in
/// every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpError {
    /// The target (or the requested parent) does not exist.
    NotFound(NodeId),
    /// The requested parent exists but can't hold children.
    NotContainer(NodeId),
    /// Moving `node` under `target` would make it its own ancestor.
    Cycle { node: NodeId, target: NodeId },
    /// Re-inserting a recorded subtree would duplicate an ID already present.
    DuplicateId(NodeId),
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpError::NotFound(id) => write!(f, "component `{id}` not found"),
            OpError::NotContainer(id) => write!(f, "component `{id}` is not a container"),
            OpError::Cycle { node, target } => {
                write!(f, "cannot move `{node}` into its own subtree (`{target}`)")
            }
            OpError::DuplicateId(id) => write!(f, "component `{id}` already exists"),
        }
    }
}

impl std::error::Error for OpError {}

// ─── Results ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Inserted {
    pub tree: ComponentTree,
    /// Where the node actually landed (the index is clamped).
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct Moved {
    pub tree: ComponentTree,
    pub from: Location,
    /// Realized destination; the index is relative to the sibling list with
    /// the moved node already detached.
    pub to: Location,
}

#[derive(Debug, Clone)]
pub struct Removed {
    pub tree: ComponentTree,
    /// Removed subtrees with their locations in the *original* tree, in
    /// document order.
    pub removed: Vec<ComponentInsert>,
}

#[derive(Debug, Clone)]
pub struct Replaced {
    pub tree: ComponentTree,
    pub prev_properties: Properties,
}

// ─── Operations ───────────────────────────────────────────────────────────

/// Splice `node` into `location`, clamping the index to `[0, len]`.
///
/// # Errors
/// `NotFound` / `NotContainer` when `location.parent_id` can't hold children.
pub fn insert(
    tree: &ComponentTree,
    node: Arc<Node>,
    location: Location,
) -> Result<Inserted, OpError> {
    let (tree, index) = edit_children(tree, location.parent_id, |children| {
        let index = location.index.min(children.len());
        children.insert(index, node);
        index
    })?;
    log::trace!("insert at {}", Location { index, ..location });
    Ok(Inserted {
        tree,
        location: Location {
            parent_id: location.parent_id,
            index,
        },
    })
}

/// Detach the subtree rooted at `node_id` and re-attach it at `location`.
///
/// Reordering within the same parent is legal; `location.index` addresses the
/// sibling list after the node has been detached.
///
/// # Errors
/// `NotFound` if the node is missing, `Cycle` if the destination is the node
/// itself or one of its descendants, and `NotFound` / `NotContainer` for a
/// bad destination parent.
pub fn move_node(
    tree: &ComponentTree,
    node_id: NodeId,
    location: Location,
) -> Result<Moved, OpError> {
    let from = tree
        .find_parent_info(node_id)
        .ok_or(OpError::NotFound(node_id))?;

    if let Some(target) = location.parent_id
        && (target == node_id || tree.is_descendant(node_id, target))
    {
        return Err(OpError::Cycle {
            node: node_id,
            target,
        });
    }

    let (detached, node) =
        edit_children(tree, from.parent_id, |children| children.remove(from.index))?;
    let inserted = insert(&detached, node, location)?;

    Ok(Moved {
        tree: inserted.tree,
        from,
        to: inserted.location,
    })
}

/// Remove every component whose ID is in `ids`, in a single pass.
///
/// A node whose ancestor is also in the set is not recorded separately: it
/// leaves (and comes back) inside the ancestor's subtree.
pub fn remove_by_ids(tree: &ComponentTree, ids: &HashSet<NodeId>) -> Removed {
    let mut removed = Vec::new();
    let nodes = if ids.is_empty() {
        None
    } else {
        prune(&tree.nodes, None, ids, &mut removed)
    };
    Removed {
        tree: ComponentTree {
            nodes: nodes.unwrap_or_else(|| tree.nodes.clone()),
        },
        removed,
    }
}

/// Substitute `next` wholesale for the node's properties.
///
/// # Errors
/// `NotFound` if the node is missing.
pub fn replace_properties(
    tree: &ComponentTree,
    node_id: NodeId,
    next: Properties,
) -> Result<Replaced, OpError> {
    let (tree, prev_properties) = edit_node(tree, node_id, |node| {
        std::mem::replace(&mut node.properties, next)
    })
    .ok_or(OpError::NotFound(node_id))?;
    Ok(Replaced {
        tree,
        prev_properties,
    })
}

// ─── Path rebuilding ──────────────────────────────────────────────────────

/// Apply `edit` to a copy of the node `id` and rebuild the path above it.
fn edit_node<R>(
    tree: &ComponentTree,
    id: NodeId,
    edit: impl FnOnce(&mut Node) -> R,
) -> Option<(ComponentTree, R)> {
    rebuild_path(&tree.nodes, id, edit)
        .ok()
        .map(|(nodes, out)| (ComponentTree { nodes }, out))
}

/// Apply `edit` to the child list addressed by `parent` (None = top level).
fn edit_children<R>(
    tree: &ComponentTree,
    parent: Option<NodeId>,
    edit: impl FnOnce(&mut Vec<Arc<Node>>) -> R,
) -> Result<(ComponentTree, R), OpError> {
    let Some(pid) = parent else {
        let mut nodes = tree.nodes.clone();
        let out = edit(&mut nodes);
        return Ok((ComponentTree { nodes }, out));
    };

    // Check first so a refused edit doesn't pay for a rebuild.
    match tree.find_by_id(pid) {
        None => return Err(OpError::NotFound(pid)),
        Some(node) if !node.is_container() => return Err(OpError::NotContainer(pid)),
        Some(_) => {}
    }

    edit_node(tree, pid, |node| {
        edit(node.children.get_or_insert_with(Vec::new))
    })
    .ok_or(OpError::NotFound(pid))
}

/// Depth-first search for `id`; on a hit, returns the rebuilt list. On a
/// miss, hands `edit` back so the caller can keep searching with it.
fn rebuild_path<R, F>(nodes: &[Arc<Node>], id: NodeId, edit: F) -> Result<(Vec<Arc<Node>>, R), F>
where
    F: FnOnce(&mut Node) -> R,
{
    let mut edit = edit;
    for (i, node) in nodes.iter().enumerate() {
        if node.id == id {
            let mut updated = Node::clone(node);
            let out = edit(&mut updated);
            return Ok((replace_at(nodes, i, updated), out));
        }
        if let Some(children) = node.children.as_deref() {
            match rebuild_path(children, id, edit) {
                Ok((children, out)) => {
                    let updated = with_children(node, children);
                    return Ok((replace_at(nodes, i, updated), out));
                }
                Err(returned) => edit = returned,
            }
        }
    }
    Err(edit)
}

/// Single-pass removal. Returns `None` when nothing under `nodes` changed,
/// so unchanged lists stay shared.
fn prune(
    nodes: &[Arc<Node>],
    parent: Option<NodeId>,
    ids: &HashSet<NodeId>,
    removed: &mut Vec<ComponentInsert>,
) -> Option<Vec<Arc<Node>>> {
    let mut changed = false;
    let mut kept = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        if ids.contains(&node.id) {
            removed.push(ComponentInsert {
                node: Arc::clone(node),
                location: Location { parent_id: parent, index },
            });
            changed = true;
            continue;
        }
        let pruned = node
            .children
            .as_deref()
            .and_then(|children| prune(children, Some(node.id), ids, removed));
        match pruned {
            Some(children) => {
                kept.push(Arc::new(with_children(node, children)));
                changed = true;
            }
            None => kept.push(Arc::clone(node)),
        }
    }
    changed.then_some(kept)
}

fn with_children(node: &Node, children: Vec<Arc<Node>>) -> Node {
    Node {
        id: node.id,
        kind: node.kind,
        properties: node.properties.clone(),
        children: Some(children),
    }
}

fn replace_at(nodes: &[Arc<Node>], index: usize, node: Node) -> Vec<Arc<Node>> {
    let mut out = nodes.to_vec();
    out[index] = Arc::new(node);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> NodeId {
        NodeId::intern(s)
    }

    fn leaf(name: &str) -> Node {
        Node::new(id(name), NodeKind::TextInput)
    }

    fn boxed(name: &str, children: Vec<Node>) -> Node {
        Node::new(id(name), NodeKind::Container).with_children(children)
    }

    fn ids(nodes: &[Arc<Node>]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    fn children_ids(tree: &ComponentTree, parent: &str) -> Vec<String> {
        tree.children_of(Some(id(parent)))
            .unwrap_or_default()
            .iter()
            .map(|n| n.id.as_str().to_string())
            .collect()
    }

    // ── insert ──

    #[test]
    fn insert_at_root_front() {
        let tree = ComponentTree::new();
        let a = insert(&tree, Arc::new(leaf("ops_a")), Location::root(0)).unwrap();
        let b = insert(&a.tree, Arc::new(leaf("ops_b")), Location::root(0)).unwrap();
        assert_eq!(ids(&b.tree.nodes), vec!["ops_b", "ops_a"]);
        // input untouched
        assert!(tree.is_empty());
        assert_eq!(ids(&a.tree.nodes), vec!["ops_a"]);
    }

    #[test]
    fn insert_clamps_index() {
        let tree = ComponentTree::from_nodes(vec![leaf("ops_c1")]);
        let out = insert(&tree, Arc::new(leaf("ops_c2")), Location::root(99)).unwrap();
        assert_eq!(out.location, Location::root(1));
        assert_eq!(ids(&out.tree.nodes), vec!["ops_c1", "ops_c2"]);
    }

    #[test]
    fn insert_into_nested_container() {
        let tree =
            ComponentTree::from_nodes(vec![boxed("ops_outer", vec![boxed("ops_inner", vec![])])]);
        let out = insert(
            &tree,
            Arc::new(leaf("ops_deep")),
            Location::child_of(id("ops_inner"), 0),
        )
        .unwrap();
        assert_eq!(children_ids(&out.tree, "ops_inner"), vec!["ops_deep"]);
        assert!(children_ids(&tree, "ops_inner").is_empty());
    }

    #[test]
    fn insert_into_leaf_is_refused() {
        let tree = ComponentTree::from_nodes(vec![leaf("ops_leaf")]);
        let err = insert(
            &tree,
            Arc::new(leaf("ops_x")),
            Location::child_of(id("ops_leaf"), 0),
        )
        .unwrap_err();
        assert_eq!(err, OpError::NotContainer(id("ops_leaf")));
    }

    #[test]
    fn insert_into_missing_parent_is_refused() {
        let tree = ComponentTree::new();
        let err = insert(
            &tree,
            Arc::new(leaf("ops_y")),
            Location::child_of(id("ops_ghost"), 0),
        )
        .unwrap_err();
        assert_eq!(err, OpError::NotFound(id("ops_ghost")));
    }

    #[test]
    fn insert_shares_untouched_subtrees() {
        let tree = ComponentTree::from_nodes(vec![
            boxed("ops_s1", vec![leaf("ops_s1a")]),
            boxed("ops_s2", vec![]),
        ]);
        let out = insert(
            &tree,
            Arc::new(leaf("ops_s2a")),
            Location::child_of(id("ops_s2"), 0),
        )
        .unwrap();
        assert!(Arc::ptr_eq(&tree.nodes[0], &out.tree.nodes[0]));
        assert!(!Arc::ptr_eq(&tree.nodes[1], &out.tree.nodes[1]));
    }

    // ── move ──

    #[test]
    fn move_container_into_other_container() {
        let tree = ComponentTree::from_nodes(vec![
            boxed("ops_c", vec![leaf("ops_d")]),
            boxed("ops_e", vec![leaf("ops_e1")]),
        ]);
        let out = move_node(&tree, id("ops_c"), Location::child_of(id("ops_e"), 1)).unwrap();
        assert_eq!(out.from, Location::root(0));
        assert_eq!(out.to, Location::child_of(id("ops_e"), 1));
        assert_eq!(ids(&out.tree.nodes), vec!["ops_e"]);
        assert_eq!(children_ids(&out.tree, "ops_e"), vec!["ops_e1", "ops_c"]);
        assert_eq!(children_ids(&out.tree, "ops_c"), vec!["ops_d"]);

        // Moving E into C would now be a cycle.
        let err = move_node(&out.tree, id("ops_e"), Location::child_of(id("ops_c"), 0))
            .unwrap_err();
        assert_eq!(
            err,
            OpError::Cycle {
                node: id("ops_e"),
                target: id("ops_c")
            }
        );
    }

    #[test]
    fn move_into_self_is_cycle() {
        let tree = ComponentTree::from_nodes(vec![boxed("ops_self", vec![])]);
        let err = move_node(&tree, id("ops_self"), Location::child_of(id("ops_self"), 0))
            .unwrap_err();
        assert!(matches!(err, OpError::Cycle { .. }));
    }

    #[test]
    fn move_reorders_siblings() {
        let tree =
            ComponentTree::from_nodes(vec![leaf("ops_r1"), leaf("ops_r2"), leaf("ops_r3")]);
        let out = move_node(&tree, id("ops_r1"), Location::root(2)).unwrap();
        assert_eq!(ids(&out.tree.nodes), vec!["ops_r2", "ops_r3", "ops_r1"]);
        assert_eq!(out.from, Location::root(0));
        assert_eq!(out.to, Location::root(2));

        // Moving back to `from` restores the original order.
        let back = move_node(&out.tree, id("ops_r1"), out.from).unwrap();
        assert_eq!(back.tree, tree);
    }

    #[test]
    fn move_missing_node_is_not_found() {
        let tree = ComponentTree::from_nodes(vec![leaf("ops_m1")]);
        let err = move_node(&tree, id("ops_nope"), Location::root(0)).unwrap_err();
        assert_eq!(err, OpError::NotFound(id("ops_nope")));
    }

    #[test]
    fn move_to_leaf_parent_leaves_tree_intact() {
        let tree = ComponentTree::from_nodes(vec![leaf("ops_l1"), leaf("ops_l2")]);
        let err = move_node(&tree, id("ops_l1"), Location::child_of(id("ops_l2"), 0))
            .unwrap_err();
        assert_eq!(err, OpError::NotContainer(id("ops_l2")));
        assert_eq!(ids(&tree.nodes), vec!["ops_l1", "ops_l2"]);
    }

    // ── remove ──

    #[test]
    fn remove_records_original_locations() {
        let tree = ComponentTree::from_nodes(vec![
            leaf("ops_x0"),
            leaf("ops_x1"),
            leaf("ops_x2"),
            leaf("ops_x3"),
        ]);
        let set: HashSet<NodeId> = [id("ops_x1"), id("ops_x2")].into_iter().collect();
        let out = remove_by_ids(&tree, &set);
        assert_eq!(ids(&out.tree.nodes), vec!["ops_x0", "ops_x3"]);
        let locs: Vec<Location> = out.removed.iter().map(|r| r.location).collect();
        assert_eq!(locs, vec![Location::root(1), Location::root(2)]);
    }

    #[test]
    fn remove_ancestor_and_descendant_records_ancestor_only() {
        let tree = ComponentTree::from_nodes(vec![
            leaf("ops_keep"),
            boxed("ops_anc", vec![leaf("ops_desc")]),
        ]);
        let set: HashSet<NodeId> = [id("ops_anc"), id("ops_desc")].into_iter().collect();
        let out = remove_by_ids(&tree, &set);
        assert_eq!(out.removed.len(), 1);
        assert_eq!(out.removed[0].node.id, id("ops_anc"));
        assert_eq!(out.removed[0].location, Location::root(1));
        assert_eq!(out.removed[0].node.child_nodes().len(), 1);
        assert_eq!(out.tree.count_nodes(), 1);
    }

    #[test]
    fn remove_nested_keeps_siblings_shared() {
        let tree = ComponentTree::from_nodes(vec![
            boxed("ops_p", vec![leaf("ops_p0"), leaf("ops_p1")]),
            boxed("ops_q", vec![leaf("ops_q0")]),
        ]);
        let set: HashSet<NodeId> = [id("ops_p1")].into_iter().collect();
        let out = remove_by_ids(&tree, &set);
        assert_eq!(out.removed[0].location, Location::child_of(id("ops_p"), 1));
        assert_eq!(children_ids(&out.tree, "ops_p"), vec!["ops_p0"]);
        assert!(Arc::ptr_eq(&tree.nodes[1], &out.tree.nodes[1]));
    }

    #[test]
    fn remove_unknown_ids_is_noop() {
        let tree = ComponentTree::from_nodes(vec![leaf("ops_u")]);
        let set: HashSet<NodeId> = [id("ops_unknown")].into_iter().collect();
        let out = remove_by_ids(&tree, &set);
        assert!(out.removed.is_empty());
        assert_eq!(out.tree, tree);
    }

    // ── replace properties ──

    #[test]
    fn replace_properties_is_wholesale() {
        let tree = ComponentTree::from_nodes(vec![
            leaf("ops_props").with_property("label", "Name").with_property("required", true),
        ]);
        let mut next = Properties::new();
        next.insert("label".into(), "Full name".into());
        let out = replace_properties(&tree, id("ops_props"), next.clone()).unwrap();
        assert_eq!(out.prev_properties.get("required"), Some(&serde_json::Value::Bool(true)));
        assert_eq!(out.tree.find_by_id(id("ops_props")).unwrap().properties, next);
        // original untouched
        assert_eq!(tree.find_by_id(id("ops_props")).unwrap().properties.len(), 2);
    }

    #[test]
    fn replace_properties_missing_node() {
        let tree = ComponentTree::new();
        let err = replace_properties(&tree, id("ops_absent"), Properties::new()).unwrap_err();
        assert_eq!(err, OpError::NotFound(id("ops_absent")));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            OpError::NotContainer(id("ops_msg")).to_string(),
            "component `ops_msg` is not a container"
        );
    }
}
