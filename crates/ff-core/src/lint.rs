//! Lint diagnostics for Form Forge documents.
//!
//! Reports structural and schema issues without modifying the document.
//! Whole-document replacement refuses anything with an `Error` finding, so
//! imported content can't break ID uniqueness or put children on a leaf.

use crate::id::NodeId;
use crate::model::{ComponentTree, Node};
use std::collections::HashSet;
use std::sync::Arc;

// ─── Diagnostic types ────────────────────────────────────────────────────

/// Severity of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Violates a tree invariant; the document must not be adopted.
    Error,
    /// Likely a mistake.
    Warning,
    /// Informational.
    Info,
}

/// A single lint diagnostic for a component.
#[derive(Debug, Clone, PartialEq)]
pub struct LintDiagnostic {
    /// The component this diagnostic refers to.
    pub node_id: NodeId,
    /// Human-readable message.
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id").
    pub rule: &'static str,
}

// ─── Public API ───────────────────────────────────────────────────────────

/// Run all lint rules over the document and return diagnostics in document
/// order.
#[must_use]
pub fn lint_document(tree: &ComponentTree) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_duplicate_ids(tree, &mut diags);
    for node in tree.flatten() {
        lint_children(node, &mut diags);
        lint_properties(node, &mut diags);
    }
    diags
}

/// Whether any diagnostic is an `Error`.
pub fn has_errors(diags: &[LintDiagnostic]) -> bool {
    diags.iter().any(|d| d.severity == LintSeverity::Error)
}

// ─── Rules ────────────────────────────────────────────────────────────────

/// Every ID must appear at most once in the whole tree.
fn lint_duplicate_ids(tree: &ComponentTree, diags: &mut Vec<LintDiagnostic>) {
    let mut seen = HashSet::new();
    for node in tree.flatten() {
        if !seen.insert(node.id) {
            diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Duplicate id `{}`; ids must be unique document-wide.", node.id),
                severity: LintSeverity::Error,
                rule: "duplicate-id",
            });
        }
    }
}

/// Only containers may hold children; containers should carry a list.
fn lint_children(node: &Arc<Node>, diags: &mut Vec<LintDiagnostic>) {
    match (&node.children, node.is_container()) {
        (Some(_), false) => diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!("`{}` is a {} and cannot hold children.", node.id, node.kind),
            severity: LintSeverity::Error,
            rule: "children-on-leaf",
        }),
        (None, true) => diags.push(LintDiagnostic {
            node_id: node.id,
            message: format!("Container `{}` has no children list.", node.id),
            severity: LintSeverity::Warning,
            rule: "missing-children",
        }),
        _ => {}
    }
}

/// Check each property against the kind's registry schema.
fn lint_properties(node: &Arc<Node>, diags: &mut Vec<LintDiagnostic>) {
    let spec = node.kind.spec();
    for (key, value) in &node.properties {
        match spec.property(key) {
            None => diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!("Unknown property `{key}` on {} `{}`.", node.kind, node.id),
                severity: LintSeverity::Info,
                rule: "unknown-property",
            }),
            Some(prop) if !prop.ty.accepts(value) => diags.push(LintDiagnostic {
                node_id: node.id,
                message: format!(
                    "Property `{key}` on `{}` expects {:?}, found `{value}`.",
                    node.id, prop.ty
                ),
                severity: LintSeverity::Warning,
                rule: "property-type",
            }),
            Some(_) => {}
        }
    }
}
