pub mod builder;
pub mod plan;
pub mod result;
pub mod tree;

pub use builder::{build_forest, build_from_document, PlanTally};
pub use plan::{decode_plan, read_plan_file, Action, ChangeType, PlanDocument, ResourceChange};
pub use result::{Error, Result};
pub use tree::{Forest, NodeDraft, NodeId, NodeKind, TreeNode};
