//! Radial layout for the sunburst.
//!
//! The partition computes target sectors for every node of the tree. Arc
//! geometry turns sectors into path data and label anchors, and the
//! transition module tweens displayed angles toward the targets.

pub mod arc;
pub mod partition;
pub mod transition;

pub use arc::{AngleSpan, Sector};
pub use partition::{PartitionConfig, PartitionLayout, RadialScale};
pub use transition::{LabelTransform, NodeTween, TransitionClock};
