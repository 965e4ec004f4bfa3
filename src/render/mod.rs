//! Rendering surface.
//!
//! A [`Frame`] is a flat, serializable description of what is on screen: one
//! arc and one label per node, in pre-order, at their displayed (possibly
//! mid-transition) angles. Any [`RenderSurface`] can draw it; [`SvgSurface`]
//! produces an SVG document.

mod color;
mod svg;

pub use color::{ColorScale, Rgb};
pub use svg::SvgSurface;

use serde::Serialize;

use crate::config::SunburstConfig;
use crate::hierarchy::{HierarchyNode, HierarchyTree, NodeKey};
use crate::layout::arc::Sector;
use crate::layout::transition::LabelTransform;
use crate::reconcile::Reconciliation;

/// One annular sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcShape {
    pub key: NodeKey,
    pub depth: u32,
    /// SVG path data; empty for zero-width arcs.
    pub path: String,
    pub fill: String,
    /// Full topic name, shown as a tooltip.
    pub title: String,
    /// 1 on the selected path or with nothing selected, dimmed otherwise.
    pub opacity: f64,
    /// False for the root and for zero-width arcs.
    pub visible: bool,
    /// Displayed geometry.
    pub sector: Sector,
}

/// One text label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelShape {
    pub key: NodeKey,
    pub text: String,
    pub transform: LabelTransform,
    /// Horizontal offset applied after the transform.
    pub dx: f64,
    /// Label opacity combined with the node's emphasis opacity.
    pub opacity: f64,
    pub visible: bool,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub arcs: Vec<ArcShape>,
    pub labels: Vec<LabelShape>,
    /// Node keys that entered, persisted or left with the last data load.
    pub nodes: Reconciliation<NodeKey>,
    pub animating: bool,
}

impl Frame {
    /// Describe the tree as currently displayed.
    pub fn build(
        tree: &HierarchyTree,
        config: &SunburstConfig,
        nodes: Reconciliation<NodeKey>,
        animating: bool,
    ) -> Self {
        let order = tree.descendants();
        let mut arcs = Vec::with_capacity(order.len());
        let mut labels = Vec::with_capacity(order.len());

        for node in order.into_iter().filter_map(|i| tree.node(i)) {
            let sector = node.arc.with_angles(node.tween.current);
            let visible = !node.state.is_hidden() && sector.angle_end > sector.angle_start;
            let opacity = if node.state.is_dimmed() {
                config.dim_opacity
            } else {
                1.0
            };

            arcs.push(ArcShape {
                key: node.key.clone(),
                depth: node.depth,
                path: sector.path(),
                fill: node.fill.clone(),
                title: node.topic.name.clone(),
                opacity,
                visible,
                sector,
            });
            labels.push(LabelShape {
                key: node.key.clone(),
                text: label_text(node, config.label_words),
                transform: LabelTransform::for_sector(&sector, config.label_orientation),
                dx: config.label_offset_x,
                opacity: node.tween.label_current * opacity,
                visible,
            });
        }

        Self {
            width: config.width,
            height: config.height,
            arcs,
            labels,
            nodes,
            animating,
        }
    }

    /// Draw onto a surface.
    pub fn draw<S: RenderSurface>(&self, surface: &mut S) {
        surface.begin(self.width, self.height);
        for arc in self.arcs.iter().filter(|a| a.visible) {
            surface.arc(arc);
        }
        for label in self.labels.iter().filter(|l| l.visible) {
            surface.label(label);
        }
        surface.end();
    }

    pub fn arc(&self, key: &NodeKey) -> Option<&ArcShape> {
        self.arcs.iter().find(|a| &a.key == key)
    }

    pub fn label(&self, key: &NodeKey) -> Option<&LabelShape> {
        self.labels.iter().find(|l| &l.key == key)
    }
}

/// The first `words` words of a node name.
fn label_text(node: &HierarchyNode, words: usize) -> String {
    node.topic
        .name
        .split_whitespace()
        .take(words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A 2D vector surface centered on its midpoint.
pub trait RenderSurface {
    /// Start a frame of the given viewport size.
    fn begin(&mut self, width: f64, height: f64);
    /// Draw one visible arc.
    fn arc(&mut self, arc: &ArcShape);
    /// Draw one visible label.
    fn label(&mut self, label: &LabelShape);
    /// Finish the frame.
    fn end(&mut self);
}
