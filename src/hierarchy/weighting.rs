//! Weighting rules: how much each node contributes to its arc.

use crate::config::{TopFilter, WeightMetric};

use super::topic::TopicNode;

/// A node's contribution is its metric value if the filter admits its rank,
/// and zero otherwise. Subtree weights are sums of contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightingRule {
    /// Which field is weighed.
    pub metric: WeightMetric,
    /// Which ranks contribute.
    pub filter: TopFilter,
}

impl WeightingRule {
    /// Full weight for every node.
    pub fn unfiltered(metric: WeightMetric) -> Self {
        Self {
            metric,
            filter: TopFilter::All,
        }
    }

    /// Own contribution of a single node, excluding its children.
    pub fn contribution(&self, topic: &TopicNode) -> f64 {
        if self.filter.includes(topic.rank) {
            topic.own_weight(self.metric)
        } else {
            0.0
        }
    }
}
