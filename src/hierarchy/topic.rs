//! Topic documents as produced by the offline topic extraction.
//!
//! A document is a corpus-level root carrying run metadata, with topics as
//! children and sub-topic phrases beneath them. Every numeric field is
//! optional on input.

use serde::{Deserialize, Serialize};

use crate::config::WeightMetric;
use crate::error::{Result, SunburstError};

/// One node of the topic hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicNode {
    /// Topic or phrase text.
    pub name: String,
    /// Raw occurrence count.
    #[serde(default)]
    pub count: u64,
    /// 1-based rank among siblings; absent for unranked nodes.
    #[serde(default)]
    pub rank: Option<u32>,
    /// Weight used by the `size` metric.
    #[serde(default)]
    pub size: f64,
    /// Number of texts mentioning the topic.
    #[serde(default, rename = "textCount")]
    pub text_count: u64,
    /// Exact phrase variants used for highlighting.
    #[serde(default)]
    pub verbatims: Vec<String>,
    /// Ids of texts mentioning the topic.
    #[serde(default, rename = "textIDs")]
    pub text_ids: Vec<String>,
    /// Sub-topics.
    #[serde(default)]
    pub children: Vec<TopicNode>,
}

impl TopicNode {
    /// Create a leaf with a name and size.
    pub fn leaf(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
            ..Default::default()
        }
    }

    /// Builder: set the rank.
    pub fn ranked(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Builder: append children.
    pub fn with_children(mut self, children: Vec<TopicNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// This node's own contribution under a metric (not including children).
    pub fn own_weight(&self, metric: WeightMetric) -> f64 {
        let raw = match metric {
            WeightMetric::Size => self.size,
            WeightMetric::TextCount => self.text_count as f64,
        };
        // Negative or NaN weights would break the partition; treat as empty.
        if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
    }
}

/// A full topic file: the root node plus run metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicDocument {
    /// The corpus-level root node.
    #[serde(flatten)]
    pub root: TopicNode,
    /// Date the extraction ran (`YYYY-MM-DD`).
    #[serde(default)]
    pub run_date: Option<String>,
    /// Date of the underlying data.
    #[serde(default)]
    pub data_date: Option<String>,
    /// Number of texts in the corpus.
    #[serde(default)]
    pub text_count: Option<u64>,
}

impl TopicDocument {
    /// Parse a topic document. `resource` names the source in errors.
    pub fn from_json(resource: &str, json: &str) -> Result<Self> {
        let doc: Self =
            serde_json::from_str(json).map_err(|e| SunburstError::malformed(resource, &e))?;
        if doc.root.name.trim().is_empty() && doc.root.children.is_empty() {
            return Err(SunburstError::DataFetch {
                resource: resource.to_string(),
                message: "topic document has no root name and no topics".into(),
            });
        }
        Ok(doc)
    }
}
