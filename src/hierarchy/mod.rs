//! Topic hierarchy: input documents, stable node keys, and the weighted tree.
//!
//! Topic JSON is parsed into [`TopicNode`]s, then [`HierarchyTree::build`]
//! moves them into a petgraph StableGraph with aggregated subtree weights and
//! a fixed sibling order.

mod node;
mod topic;
mod tree;
mod weighting;

pub use node::{NodeKey, NodeState};
pub use topic::{TopicDocument, TopicNode};
pub use tree::{HierarchyNode, HierarchyTree};
pub use weighting::WeightingRule;
