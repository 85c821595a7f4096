pub mod clone;
pub mod id;
pub mod lint;
pub mod locate;
pub mod model;
pub mod ops;
pub mod persist;
pub mod registry;

pub use clone::{clone_tree_with_new_identity, clone_with_new_identity};
pub use id::NodeId;
pub use lint::{LintDiagnostic, LintSeverity, has_errors, lint_document};
pub use model::*;
pub use ops::{Inserted, Moved, OpError, Removed, Replaced};
pub use persist::{NamedSnapshot, PersistedDocument};
