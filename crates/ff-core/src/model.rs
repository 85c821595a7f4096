//! Core data model for Form Forge documents.
//!
//! A document is an ordered forest of [`Node`]s. Containers own an ordered
//! list of children (render / tab order); every other kind is a leaf.
//! Subtrees are held behind `Arc` so structural operations rebuild only the
//! path from the root list down to the node they touch, and every untouched
//! subtree is shared between the old and the new tree.

use crate::id::NodeId;
use crate::registry::{self, KindSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Property bag of a component. Patches are merged by the caller, so a node
/// always stores a complete map.
pub type Properties = BTreeMap<String, serde_json::Value>;

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The closed set of component kinds. Per-kind behavior (default
/// properties, whether children are allowed) lives in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Container,
    TextInput,
    TextArea,
    NumberInput,
    EmailInput,
    PasswordInput,
    Checkbox,
    RadioGroup,
    Select,
    Switch,
    DateInput,
    Button,
    Heading,
    Paragraph,
    Divider,
}

impl NodeKind {
    pub const ALL: [NodeKind; 15] = [
        NodeKind::Container,
        NodeKind::TextInput,
        NodeKind::TextArea,
        NodeKind::NumberInput,
        NodeKind::EmailInput,
        NodeKind::PasswordInput,
        NodeKind::Checkbox,
        NodeKind::RadioGroup,
        NodeKind::Select,
        NodeKind::Switch,
        NodeKind::DateInput,
        NodeKind::Button,
        NodeKind::Heading,
        NodeKind::Paragraph,
        NodeKind::Divider,
    ];

    /// Registry entry for this kind.
    pub fn spec(self) -> &'static KindSpec {
        registry::spec(self)
    }

    pub fn allows_children(self) -> bool {
        self.spec().allows_children
    }

    /// Stable wire name (`"text_input"`, ...).
    pub fn as_str(self) -> &'static str {
        self.spec().name
    }

    /// Parse a wire name back into a kind.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A single component in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Globally unique across the whole document.
    pub id: NodeId,

    pub kind: NodeKind,

    #[serde(default)]
    pub properties: Properties,

    /// Present only on containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<Node>>>,
}

impl Node {
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            properties: Properties::new(),
            children: kind.allows_children().then(Vec::new),
        }
    }

    /// Factory: fresh ID and the kind's default properties.
    #[must_use]
    pub fn create(kind: NodeKind) -> Self {
        let spec = kind.spec();
        let mut node = Self::new(NodeId::fresh(spec.id_prefix), kind);
        node.properties = spec.default_properties();
        node
    }

    /// Builder-style property setter, mostly for fixtures and tests.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Builder-style child list. Only meaningful on containers.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind.allows_children()
    }

    /// Children as a slice; empty for leaves.
    pub fn child_nodes(&self) -> &[Arc<Node>] {
        self.children.as_deref().unwrap_or(&[])
    }
}

// ─── Tree ────────────────────────────────────────────────────────────────

/// The whole document: the ordered list of top-level components.
///
/// Cheap to clone (one `Arc` bump per top-level node). Treated as immutable;
/// every structural operation returns a new tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentTree {
    pub nodes: Vec<Arc<Node>>,
}

impl ComponentTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of top-level components.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

// ─── Addressing & deltas ─────────────────────────────────────────────────

/// A slot in the tree: `parent_id = None` is the top-level list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub parent_id: Option<NodeId>,
    pub index: usize,
}

impl Location {
    pub const fn root(index: usize) -> Self {
        Self {
            parent_id: None,
            index,
        }
    }

    pub const fn child_of(parent_id: NodeId, index: usize) -> Self {
        Self {
            parent_id: Some(parent_id),
            index,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parent_id {
            Some(parent) => write!(f, "{parent}[{}]", self.index),
            None => write!(f, "root[{}]", self.index),
        }
    }
}

/// "This exact subtree existed at this exact location."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInsert {
    pub node: Arc<Node>,
    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn factory_assigns_fresh_ids_and_defaults() {
        let a = Node::create(NodeKind::TextInput);
        let b = Node::create(NodeKind::TextInput);
        assert_ne!(a.id, b.id);
        assert!(a.id.as_str().starts_with("text_input_"));
        assert!(a.properties.contains_key("label"));
        assert!(a.children.is_none());
    }

    #[test]
    fn containers_start_with_empty_children() {
        let c = Node::create(NodeKind::Container);
        assert_eq!(c.children, Some(Vec::new()));
        assert!(c.is_container());
    }

    #[test]
    fn kind_names_roundtrip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("marquee"), None);
    }

    #[test]
    fn serializes_plain_nested_structure() {
        let tree = ComponentTree::from_nodes(vec![
            Node::new(NodeId::intern("section"), NodeKind::Container).with_children(vec![
                Node::new(NodeId::intern("name"), NodeKind::TextInput)
                    .with_property("label", "Name"),
            ]),
        ]);
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": "section",
                "kind": "container",
                "properties": {},
                "children": [{
                    "id": "name",
                    "kind": "text_input",
                    "properties": { "label": "Name" }
                }]
            }])
        );

        let back: ComponentTree = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::root(2).to_string(), "root[2]");
        assert_eq!(
            Location::child_of(NodeId::intern("box"), 0).to_string(),
            "box[0]"
        );
    }
}
