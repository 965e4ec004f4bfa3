//! Spatial indexing for pointer hit testing.
//!
//! Arcs are indexed by their bounding boxes in an R-tree; candidates are then
//! checked against the exact annular sector.

mod rtree;

pub use rtree::{ArcEntry, ArcHitIndex};
