//! Radial partition layout.
//!
//! Assigns every node of a weighted [`HierarchyTree`] an angular span and a
//! radial band:
//!
//! 1. **Angles (top-down):** the root spans `[0, 2π]`. Each parent's span is
//!    split among its children in sibling order, proportionally to their
//!    subtree weights. Boundaries come from a running prefix sum and the last
//!    positive child ends exactly on the parent's end, so children tile the
//!    parent with no gap or overlap.
//! 2. **Radii:** depth `d` of a tree with `h + 1` levels occupies band `d` of
//!    `h + 1` bands, equal width by default.
//!
//! Zero-weight children keep a zero-width span at their sibling position, so
//! they stay in the tree and can tween back in later.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::hierarchy::HierarchyTree;

use super::arc::Sector;

/// How band boundaries are spaced along the radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadialScale {
    /// Equal-width bands.
    #[default]
    Linear,
    /// Equal-area bands (boundary radius grows with the square root of depth).
    Sqrt,
}

/// Configuration for the partition layout.
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    /// Outer radius of the deepest band.
    pub radius: f64,
    /// Band spacing.
    pub scale: RadialScale,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            radius: 250.0,
            scale: RadialScale::Linear,
        }
    }
}

/// The radial partition layout engine.
pub struct PartitionLayout {
    config: PartitionConfig,
}

impl PartitionLayout {
    /// Create a new partition layout with the given configuration.
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    /// Create a partition layout with the given outer radius.
    pub fn with_radius(radius: f64) -> Self {
        Self::new(PartitionConfig {
            radius,
            ..Default::default()
        })
    }

    /// Lay out every node, writing each node's target sector.
    ///
    /// Returns the number of nodes with a non-zero angular span.
    pub fn compute(&self, tree: &mut HierarchyTree) -> usize {
        let levels = tree.height() + 1;
        let root = tree.root();

        let root_sector = Sector::new(0.0, TAU, 0.0, self.boundary(1, levels));
        if let Some(node) = tree.node_mut(root) {
            node.arc = root_sector;
        }

        let mut visible = 1;
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            let parent_arc = match tree.node(parent) {
                Some(node) => node.arc,
                None => continue,
            };
            let children = tree.children(parent);
            if children.is_empty() {
                continue;
            }

            let weights: Vec<f64> = children
                .iter()
                .map(|&c| tree.node(c).map(|n| n.weight.max(0.0)).unwrap_or(0.0))
                .collect();
            let total: f64 = weights.iter().sum();
            let width = parent_arc.angle_end - parent_arc.angle_start;

            let mut prefix = 0.0;
            let mut cursor = parent_arc.angle_start;
            for (&child, &weight) in children.iter().zip(&weights) {
                prefix += weight;
                let end = if total <= 0.0 {
                    parent_arc.angle_start
                } else if prefix >= total {
                    parent_arc.angle_end
                } else {
                    parent_arc.angle_start + width * (prefix / total)
                };

                let Some(node) = tree.node_mut(child) else {
                    continue;
                };
                let depth = node.depth;
                node.arc = Sector::new(
                    cursor,
                    end,
                    self.boundary(depth, levels),
                    self.boundary(depth + 1, levels),
                );
                if end > cursor {
                    visible += 1;
                }
                cursor = end;
                stack.push(child);
            }
        }

        visible
    }

    /// Radius of the boundary between band `k - 1` and band `k`.
    fn boundary(&self, k: u32, levels: u32) -> f64 {
        let levels = levels.max(1) as f64;
        match self.config.scale {
            RadialScale::Linear => self.config.radius * k as f64 / levels,
            RadialScale::Sqrt => self.config.radius * (k as f64 / levels).sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TopFilter, WeightMetric};
    use crate::hierarchy::{NodeKey, TopicNode, WeightingRule};

    fn sample() -> TopicNode {
        TopicNode::leaf("corpus", 0.0).with_children(vec![
            TopicNode::leaf("a", 3.0).ranked(1).with_children(vec![
                TopicNode::leaf("a1", 1.0).ranked(1),
                TopicNode::leaf("a2", 2.0).ranked(2),
                TopicNode::leaf("a3", 0.7).ranked(6),
            ]),
            TopicNode::leaf("b", 2.0).ranked(2).with_children(vec![
                TopicNode::leaf("b1", 1.0).ranked(1),
            ]),
            TopicNode::leaf("c", 1.3).ranked(6),
            TopicNode::leaf("d", 0.1).ranked(7),
        ])
    }

    /// Every parent's children tile it exactly.
    fn assert_partition(tree: &HierarchyTree) {
        for index in tree.descendants() {
            let parent = tree.node(index).unwrap().arc;
            let children = tree.children(index);
            if children.is_empty() {
                continue;
            }
            let arcs: Vec<Sector> = children.iter().map(|&c| tree.node(c).unwrap().arc).collect();
            let any_weight = children.iter().any(|&c| tree.node(c).unwrap().weight > 0.0);
            if !any_weight {
                for arc in &arcs {
                    assert_eq!(arc.angle_start, arc.angle_end);
                }
                continue;
            }

            assert_eq!(arcs[0].angle_start, parent.angle_start);
            assert_eq!(arcs[arcs.len() - 1].angle_end, parent.angle_end);
            for pair in arcs.windows(2) {
                assert_eq!(pair[0].angle_end, pair[1].angle_start, "gap or overlap");
            }
            let sum: f64 = arcs.iter().map(|a| a.angle_end - a.angle_start).sum();
            let width = parent.angle_end - parent.angle_start;
            assert!((sum - width).abs() < 1e-12, "sum {sum} != width {width}");
        }
    }

    #[test]
    fn test_root_spans_full_circle() {
        for filter in [TopFilter::All, TopFilter::Top(5), TopFilter::Top(1)] {
            let mut tree = HierarchyTree::build(sample(), WeightMetric::Size);
            tree.apply_weighting(WeightingRule {
                metric: WeightMetric::Size,
                filter,
            });
            PartitionLayout::with_radius(300.0).compute(&mut tree);

            let root = tree.node(tree.root()).unwrap().arc;
            assert_eq!(root.angle_start, 0.0);
            assert_eq!(root.angle_end, TAU);
        }
    }

    #[test]
    fn test_children_partition_parent() {
        let mut tree = HierarchyTree::build(sample(), WeightMetric::Size);
        PartitionLayout::with_radius(300.0).compute(&mut tree);
        assert_partition(&tree);

        tree.apply_weighting(WeightingRule {
            metric: WeightMetric::Size,
            filter: TopFilter::Top(5),
        });
        PartitionLayout::with_radius(300.0).compute(&mut tree);
        assert_partition(&tree);
    }

    #[test]
    fn test_proportional_spans() {
        let root = TopicNode::leaf("r", 0.0).with_children(vec![
            TopicNode::leaf("x", 3.0),
            TopicNode::leaf("y", 1.0),
        ]);
        let mut tree = HierarchyTree::build(root, WeightMetric::Size);
        PartitionLayout::with_radius(100.0).compute(&mut tree);

        let x = tree.get(&NodeKey::from("r/x")).unwrap().arc;
        let y = tree.get(&NodeKey::from("r/y")).unwrap().arc;
        assert!((x.angle_end - x.angle_start - 0.75 * TAU).abs() < 1e-12);
        assert!((y.angle_end - y.angle_start - 0.25 * TAU).abs() < 1e-12);
    }

    #[test]
    fn test_own_weight_does_not_open_gaps() {
        // The parent's own size counts toward its share among siblings but
        // its children still fill the parent's whole span
        let root = TopicNode::leaf("r", 0.0).with_children(vec![
            TopicNode::leaf("p", 10.0).with_children(vec![TopicNode::leaf("only", 1.0)]),
            TopicNode::leaf("q", 11.0),
        ]);
        let mut tree = HierarchyTree::build(root, WeightMetric::Size);
        PartitionLayout::with_radius(100.0).compute(&mut tree);

        let p = tree.get(&NodeKey::from("r/p")).unwrap().arc;
        let only = tree.get(&NodeKey::from("r/p/only")).unwrap().arc;
        assert_eq!(only.angle_start, p.angle_start);
        assert_eq!(only.angle_end, p.angle_end);
        assert!((p.angle_end - p.angle_start - TAU / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weight_nodes_persist_with_zero_width() {
        let mut tree = HierarchyTree::build(sample(), WeightMetric::Size);
        let before = tree.descendants();
        tree.apply_weighting(WeightingRule {
            metric: WeightMetric::Size,
            filter: TopFilter::Top(5),
        });
        PartitionLayout::with_radius(300.0).compute(&mut tree);

        assert_eq!(tree.descendants(), before);
        for key in ["corpus/c", "corpus/d", "corpus/a/a3"] {
            let arc = tree.get(&NodeKey::from(key)).unwrap().arc;
            assert_eq!(arc.angle_start, arc.angle_end, "{key} should be zero-width");
        }
        let a = tree.get(&NodeKey::from("corpus/a")).unwrap().arc;
        assert!(a.angle_end > a.angle_start);
    }

    #[test]
    fn test_all_zero_children_collapse_at_start() {
        let root = TopicNode::leaf("r", 0.0).with_children(vec![
            TopicNode::leaf("x", 1.0).ranked(9),
            TopicNode::leaf("y", 1.0).ranked(8),
        ]);
        let mut tree = HierarchyTree::build(root, WeightMetric::Size);
        tree.apply_weighting(WeightingRule {
            metric: WeightMetric::Size,
            filter: TopFilter::Top(5),
        });
        let visible = PartitionLayout::with_radius(100.0).compute(&mut tree);
        assert_eq!(visible, 1);

        for key in ["r/x", "r/y"] {
            let arc = tree.get(&NodeKey::from(key)).unwrap().arc;
            assert_eq!(arc.angle_start, 0.0);
            assert_eq!(arc.angle_end, 0.0);
        }
    }

    #[test]
    fn test_equal_radial_bands() {
        let mut tree = HierarchyTree::build(sample(), WeightMetric::Size);
        PartitionLayout::with_radius(300.0).compute(&mut tree);

        let root = tree.node(tree.root()).unwrap().arc;
        assert_eq!((root.radius_inner, root.radius_outer), (0.0, 100.0));
        let a = tree.get(&NodeKey::from("corpus/a")).unwrap().arc;
        assert_eq!((a.radius_inner, a.radius_outer), (100.0, 200.0));
        let a1 = tree.get(&NodeKey::from("corpus/a/a1")).unwrap().arc;
        assert_eq!((a1.radius_inner, a1.radius_outer), (200.0, 300.0));
    }

    #[test]
    fn test_sqrt_bands_are_equal_area() {
        let mut tree = HierarchyTree::build(sample(), WeightMetric::Size);
        PartitionLayout::new(PartitionConfig {
            radius: 300.0,
            scale: RadialScale::Sqrt,
        })
        .compute(&mut tree);

        let area = |arc: Sector| arc.radius_outer.powi(2) - arc.radius_inner.powi(2);
        let root = tree.node(tree.root()).unwrap().arc;
        let a = tree.get(&NodeKey::from("corpus/a")).unwrap().arc;
        let a1 = tree.get(&NodeKey::from("corpus/a/a1")).unwrap().arc;
        assert!((area(root) - area(a)).abs() < 1e-6);
        assert!((area(a) - area(a1)).abs() < 1e-6);
        assert!((a1.radius_outer - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_node_tree() {
        let mut tree = HierarchyTree::build(TopicNode::leaf("alone", 1.0), WeightMetric::Size);
        let visible = PartitionLayout::with_radius(50.0).compute(&mut tree);
        assert_eq!(visible, 1);
        let root = tree.node(tree.root()).unwrap().arc;
        assert_eq!(root, Sector::new(0.0, TAU, 0.0, 50.0));
    }
}
