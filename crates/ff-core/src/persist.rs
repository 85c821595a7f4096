//! Persisted document format.
//!
//! Only the current tree and user-saved named snapshots are persisted;
//! history is session-local. Two encodings are supported: JSON for
//! import/export and storage, MessagePack for compact snapshot blobs.

use crate::model::{ComponentTree, Node};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

/// A user-saved copy of the document. Its IDs are fresh at save time so it
/// never aliases the live tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSnapshot {
    pub name: String,
    pub nodes: ComponentTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub nodes: ComponentTree,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub snapshots: Vec<NamedSnapshot>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

impl PersistedDocument {
    pub fn new(nodes: ComponentTree, snapshots: Vec<NamedSnapshot>) -> Self {
        Self {
            version: FORMAT_VERSION,
            nodes,
            snapshots,
        }
    }

    /// # Errors
    /// Returns the serializer error as a string.
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("JSON encode error: {e}"))
    }

    /// # Errors
    /// Returns a message if the input is not a valid persisted document or
    /// has a newer format version.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let doc: Self =
            serde_json::from_str(json).map_err(|e| format!("JSON decode error: {e}"))?;
        doc.checked()
    }

    /// Compact binary encoding (MessagePack, named fields).
    ///
    /// # Errors
    /// Returns the serializer error as a string.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, String> {
        rmp_serde::to_vec_named(self).map_err(|e| format!("MessagePack encode error: {e}"))
    }

    /// # Errors
    /// Returns a message if the bytes don't decode to a persisted document.
    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, String> {
        let doc: Self = rmp_serde::from_slice(bytes)
            .map_err(|e| format!("MessagePack decode error: {e}"))?;
        doc.checked()
    }

    fn checked(mut self) -> Result<Self, String> {
        if self.version > FORMAT_VERSION {
            return Err(format!(
                "document format v{} is newer than supported v{FORMAT_VERSION}",
                self.version
            ));
        }
        self.nodes = normalize_containers(&self.nodes);
        for snap in &mut self.snapshots {
            snap.nodes = normalize_containers(&snap.nodes);
        }
        Ok(self)
    }
}

/// Parse a bare node array (`[{id, kind, properties, children?}, ...]`), the
/// exchange format used by import/export collaborators.
///
/// # Errors
/// Returns the decoder error as a string.
pub fn parse_tree_json(json: &str) -> Result<ComponentTree, String> {
    let tree: ComponentTree =
        serde_json::from_str(json).map_err(|e| format!("JSON decode error: {e}"))?;
    Ok(normalize_containers(&tree))
}

/// Serialize a tree as a bare node array.
///
/// # Errors
/// Returns the serializer error as a string.
pub fn tree_to_json(tree: &ComponentTree) -> Result<String, String> {
    serde_json::to_string(tree).map_err(|e| format!("JSON encode error: {e}"))
}

/// Give every container an explicit (possibly empty) children list.
/// The wire format omits `children` when empty-and-absent; in memory a
/// container always has `Some`.
pub fn normalize_containers(tree: &ComponentTree) -> ComponentTree {
    ComponentTree {
        nodes: tree.nodes.iter().map(normalize_node).collect(),
    }
}

fn normalize_node(node: &Arc<Node>) -> Arc<Node> {
    match (&node.children, node.is_container()) {
        (None, true) => Arc::new(Node {
            children: Some(Vec::new()),
            ..Node::clone(node)
        }),
        (Some(children), _) => {
            let normalized: Vec<Arc<Node>> = children.iter().map(normalize_node).collect();
            if normalized
                .iter()
                .zip(children)
                .all(|(a, b)| Arc::ptr_eq(a, b))
            {
                Arc::clone(node)
            } else {
                Arc::new(Node {
                    children: Some(normalized),
                    ..Node::clone(node)
                })
            }
        }
        (None, false) => Arc::clone(node),
    }
}
