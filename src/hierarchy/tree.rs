//! HierarchyTree - the weighted topic tree the layout runs over.
//!
//! The topology lives in petgraph's StableGraph with parent→child edges. The
//! edge weight is the child's ordinal among its siblings, fixed once at
//! ingestion from the unfiltered weights, so later re-weighting never
//! reorders anything.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use super::node::{NodeKey, NodeState};
use super::topic::TopicNode;
use super::weighting::WeightingRule;
use crate::config::WeightMetric;
use crate::layout::arc::Sector;
use crate::layout::transition::NodeTween;

/// One node of the computed tree: topic data plus derived layout state.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    /// Stable identity.
    pub key: NodeKey,
    /// Topic payload (its `children` are moved into the graph and left empty).
    pub topic: TopicNode,
    /// Depth in the tree (root = 0).
    pub depth: u32,
    /// Subtree weight with every node included; fixes sibling order.
    pub base_weight: f64,
    /// Subtree weight under the current weighting rule.
    pub weight: f64,
    /// Target sector from the most recent partition.
    pub arc: Sector,
    /// Displayed angles and the in-flight tween toward `arc`.
    pub tween: NodeTween,
    /// Fill color assigned at load.
    pub fill: String,
    /// Display flags.
    pub state: NodeState,
}

/// The weighted, ordered topic tree.
pub struct HierarchyTree {
    /// Parent→child edges weighted by sibling ordinal.
    graph: StableGraph<HierarchyNode, u32, Directed>,

    /// Map from stable key to petgraph index
    key_to_index: HashMap<NodeKey, NodeIndex>,

    root: NodeIndex,

    /// Deepest depth present (root-only tree = 0).
    height: u32,

    metric: WeightMetric,
}

impl HierarchyTree {
    /// Build a tree from a topic root.
    ///
    /// Assigns keys, computes unfiltered subtree weights under `metric`, and
    /// orders siblings by descending weight. Ties keep input order.
    pub fn build(root: TopicNode, metric: WeightMetric) -> Self {
        let mut graph = StableGraph::new();
        let mut key_to_index = HashMap::new();
        let mut height = 0;

        let key = NodeKey::root(&root.name);
        let (root_idx, _) = Self::insert(
            root,
            key,
            0,
            metric,
            &mut graph,
            &mut key_to_index,
            &mut height,
        );

        Self {
            graph,
            key_to_index,
            root: root_idx,
            height,
            metric,
        }
    }

    /// Insert `topic` and its subtree. Returns the index and the unfiltered
    /// subtree weight.
    fn insert(
        mut topic: TopicNode,
        key: NodeKey,
        depth: u32,
        metric: WeightMetric,
        graph: &mut StableGraph<HierarchyNode, u32, Directed>,
        key_to_index: &mut HashMap<NodeKey, NodeIndex>,
        height: &mut u32,
    ) -> (NodeIndex, f64) {
        *height = (*height).max(depth);
        let children = std::mem::take(&mut topic.children);
        let own = WeightingRule::unfiltered(metric).contribution(&topic);

        let index = graph.add_node(HierarchyNode {
            key: key.clone(),
            topic,
            depth,
            base_weight: own,
            weight: own,
            arc: Sector::default(),
            tween: NodeTween::default(),
            fill: String::new(),
            state: NodeState::new(),
        });
        key_to_index.insert(key.clone(), index);

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut inserted: Vec<(NodeIndex, f64)> = Vec::with_capacity(children.len());
        for child in children {
            let occurrence = seen.entry(child.name.clone()).or_insert(0);
            let child_key = key.child(&child.name, *occurrence);
            *occurrence += 1;
            inserted.push(Self::insert(
                child,
                child_key,
                depth + 1,
                metric,
                graph,
                key_to_index,
                height,
            ));
        }

        // Stable sort: equal weights keep their input order
        inserted.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut subtree = own;
        for (ordinal, &(child, weight)) in inserted.iter().enumerate() {
            graph.add_edge(index, child, ordinal as u32);
            subtree += weight;
        }

        graph[index].base_weight = subtree;
        graph[index].weight = subtree;
        (index, subtree)
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// The root index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Deepest depth in the tree.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Metric the sibling order was computed with.
    pub fn metric(&self) -> WeightMetric {
        self.metric
    }

    /// Look up a node by key.
    pub fn index_of(&self, key: &NodeKey) -> Option<NodeIndex> {
        self.key_to_index.get(key).copied()
    }

    /// Get a node.
    pub fn node(&self, index: NodeIndex) -> Option<&HierarchyNode> {
        self.graph.node_weight(index)
    }

    /// Get a node mutably.
    pub fn node_mut(&mut self, index: NodeIndex) -> Option<&mut HierarchyNode> {
        self.graph.node_weight_mut(index)
    }

    /// Get a node by key.
    pub fn get(&self, key: &NodeKey) -> Option<&HierarchyNode> {
        self.index_of(key).and_then(|i| self.node(i))
    }

    /// Children of a node in sibling order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(u32, NodeIndex)> = self
            .graph
            .edges_directed(index, Direction::Outgoing)
            .map(|e| (*e.weight(), e.target()))
            .collect();
        edges.sort_unstable_by_key(|&(ordinal, _)| ordinal);
        edges.into_iter().map(|(_, child)| child).collect()
    }

    /// Parent of a node (None for the root).
    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(index, Direction::Incoming)
            .next()
    }

    /// Ordered path from the root to `index`, excluding the root and
    /// including `index`. Empty for the root itself; None if `index` is not
    /// in this tree.
    pub fn path_from_root(&self, index: NodeIndex) -> Option<Vec<NodeIndex>> {
        self.graph.node_weight(index)?;
        let mut path = Vec::new();
        let mut current = index;
        while current != self.root {
            path.push(current);
            current = self.parent(current)?;
        }
        path.reverse();
        Some(path)
    }

    /// All nodes in pre-order (root first, siblings in order).
    pub fn descendants(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            order.push(index);
            let mut children = self.children(index);
            children.reverse();
            stack.extend(children);
        }
        order
    }

    /// Iterate over every node.
    pub fn nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    /// Iterate mutably over every node.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut HierarchyNode> {
        self.graph.node_weights_mut()
    }

    // =========================================================================
    // Weighting
    // =========================================================================

    /// Recompute every subtree weight under `rule` without touching order.
    pub fn apply_weighting(&mut self, rule: WeightingRule) {
        // Reverse pre-order visits children before their parents
        let order = self.descendants();
        for &index in order.iter().rev() {
            let children_weight: f64 = self
                .children(index)
                .into_iter()
                .map(|c| self.graph[c].weight)
                .sum();
            let node = &mut self.graph[index];
            node.weight = rule.contribution(&node.topic) + children_weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TopFilter;

    fn names(tree: &HierarchyTree, indices: &[NodeIndex]) -> Vec<String> {
        indices
            .iter()
            .map(|&i| tree.node(i).unwrap().topic.name.clone())
            .collect()
    }

    fn sample() -> TopicNode {
        TopicNode::leaf("corpus", 0.0).with_children(vec![
            TopicNode::leaf("small", 1.0)
                .ranked(3)
                .with_children(vec![TopicNode::leaf("s1", 1.0).ranked(1)]),
            TopicNode::leaf("big", 5.0).ranked(1).with_children(vec![
                TopicNode::leaf("b1", 2.0).ranked(1),
                TopicNode::leaf("b2", 3.0).ranked(2),
            ]),
            TopicNode::leaf("mid", 4.0).ranked(2),
        ])
    }

    #[test]
    fn test_build_assigns_subtree_weights() {
        let tree = HierarchyTree::build(sample(), WeightMetric::Size);
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.height(), 2);

        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.weight, 16.0);
        assert_eq!(root.depth, 0);

        let big = tree.get(&NodeKey::from("corpus/big")).unwrap();
        assert_eq!(big.weight, 10.0);
        assert_eq!(big.depth, 1);
        assert!(big.topic.children.is_empty());
    }

    #[test]
    fn test_siblings_sorted_descending() {
        let tree = HierarchyTree::build(sample(), WeightMetric::Size);
        let children = tree.children(tree.root());
        assert_eq!(names(&tree, &children), vec!["big", "mid", "small"]);

        let big = tree.index_of(&NodeKey::from("corpus/big")).unwrap();
        assert_eq!(names(&tree, &tree.children(big)), vec!["b2", "b1"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let root = TopicNode::leaf("r", 0.0).with_children(vec![
            TopicNode::leaf("first", 2.0),
            TopicNode::leaf("second", 2.0),
            TopicNode::leaf("third", 2.0),
        ]);
        let tree = HierarchyTree::build(root, WeightMetric::Size);
        assert_eq!(
            names(&tree, &tree.children(tree.root())),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_duplicate_names_get_distinct_keys() {
        let root = TopicNode::leaf("r", 0.0).with_children(vec![
            TopicNode::leaf("dup", 1.0),
            TopicNode::leaf("dup", 1.0),
        ]);
        let tree = HierarchyTree::build(root, WeightMetric::Size);
        assert_eq!(tree.node_count(), 3);
        assert!(tree.index_of(&NodeKey::from("r/dup")).is_some());
        assert!(tree.index_of(&NodeKey::from("r/dup~1")).is_some());
    }

    #[test]
    fn test_path_from_root() {
        let tree = HierarchyTree::build(sample(), WeightMetric::Size);
        let b1 = tree.index_of(&NodeKey::from("corpus/big/b1")).unwrap();
        let path = tree.path_from_root(b1).unwrap();
        assert_eq!(names(&tree, &path), vec!["big", "b1"]);

        assert_eq!(tree.path_from_root(tree.root()), Some(Vec::new()));
    }

    #[test]
    fn test_descendants_preorder() {
        let tree = HierarchyTree::build(sample(), WeightMetric::Size);
        let order = tree.descendants();
        assert_eq!(
            names(&tree, &order),
            vec!["corpus", "big", "b2", "b1", "mid", "small", "s1"]
        );
    }

    #[test]
    fn test_weighting_zeroes_without_reordering() {
        let mut tree = HierarchyTree::build(sample(), WeightMetric::Size);
        let before = tree.descendants();

        tree.apply_weighting(WeightingRule {
            metric: WeightMetric::Size,
            filter: TopFilter::Top(1),
        });

        assert_eq!(tree.descendants(), before);
        let small = tree.get(&NodeKey::from("corpus/small")).unwrap();
        // small itself (rank 3) drops out, its rank-1 child stays
        assert_eq!(small.weight, 1.0);
        let mid = tree.get(&NodeKey::from("corpus/mid")).unwrap();
        assert_eq!(mid.weight, 0.0);
        let big = tree.get(&NodeKey::from("corpus/big")).unwrap();
        assert_eq!(big.weight, 7.0);
        assert_eq!(big.base_weight, 10.0);
    }

    #[test]
    fn test_text_count_metric() {
        let mut a = TopicNode::leaf("a", 100.0);
        a.text_count = 1;
        let mut b = TopicNode::leaf("b", 1.0);
        b.text_count = 9;
        let root = TopicNode::leaf("r", 0.0).with_children(vec![a, b]);

        let tree = HierarchyTree::build(root, WeightMetric::TextCount);
        assert_eq!(names(&tree, &tree.children(tree.root())), vec!["b", "a"]);
        assert_eq!(tree.node(tree.root()).unwrap().weight, 10.0);
    }
}
