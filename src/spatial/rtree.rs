//! R-tree based arc index using the rstar crate.
//!
//! Provides O(log n) point queries over the displayed sectors:
//! - Candidate lookup by bounding box
//! - Exact sector containment
//! - Deepest hit wins

use rstar::{RTree, RTreeObject, AABB};

use crate::hierarchy::NodeKey;
use crate::layout::arc::Sector;

/// A displayed arc in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcEntry {
    /// The node this arc belongs to.
    pub key: NodeKey,
    /// Depth of the node, used to prefer the innermost-nested hit.
    pub depth: u32,
    /// Sector in chart coordinates (origin at the center).
    pub sector: Sector,
}

impl ArcEntry {
    /// Create a new ArcEntry.
    pub fn new(key: NodeKey, depth: u32, sector: Sector) -> Self {
        Self { key, depth, sector }
    }
}

impl RTreeObject for ArcEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (min_x, min_y, max_x, max_y) = self.sector.bounds();
        AABB::from_corners([min_x, min_y], [max_x, max_y])
    }
}

/// Spatial index for displayed arcs.
pub struct ArcHitIndex {
    tree: RTree<ArcEntry>,
}

impl ArcHitIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Find the node whose arc contains `(x, y)`, relative to the center.
    ///
    /// When arcs overlap mid-transition the deepest one wins.
    pub fn hit(&self, x: f64, y: f64) -> Option<&NodeKey> {
        self.tree
            .locate_in_envelope_intersecting(&AABB::from_point([x, y]))
            .filter(|entry| entry.sector.contains(x, y))
            .max_by_key(|entry| entry.depth)
            .map(|entry| &entry.key)
    }

    /// Rebuild the index from a list of entries. Zero-width arcs are never
    /// hit and are skipped.
    pub fn rebuild(&mut self, entries: Vec<ArcEntry>) {
        let entries: Vec<_> = entries
            .into_iter()
            .filter(|e| e.sector.angle_end - e.sector.angle_start > 0.0)
            .collect();
        self.tree = RTree::bulk_load(entries);
    }

    /// Clear all arcs from the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }
}

impl Default for ArcHitIndex {
    fn default() -> Self {
        Self::new()
    }
}
