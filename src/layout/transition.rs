//! Arc tweening between two layouts.
//!
//! Every node carries a [`NodeTween`]: the span it is animating from, the
//! span it is animating to, and the span currently displayed. One shared
//! [`TransitionClock`] turns wall time into eased progress, and every node is
//! advanced with the same `t`, so all arcs move in lockstep.
//!
//! Each advance overwrites the displayed span. When a new layout lands
//! mid-animation, [`NodeTween::retarget`] starts the next tween from the
//! displayed span, so arcs never snap back.

use std::f64::consts::PI;

use serde::Serialize;

use crate::config::LabelOrientation;

use super::arc::{AngleSpan, Sector};

/// Linear interpolation between two scalars. Exact at both ends.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// Build a tween from `from` to `to`: `t = 0` yields `from`, `t = 1` yields
/// `to`, and each bound moves linearly in between.
pub fn interpolate(from: AngleSpan, to: AngleSpan) -> impl Fn(f64) -> AngleSpan {
    move |t| AngleSpan::new(lerp(from.start, to.start, t), lerp(from.end, to.end, t))
}

/// Cubic in-out easing on `[0, 1]`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let u = t - 2.0;
        (u * u * u + 2.0) / 2.0
    }
}

/// Per-node tween state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeTween {
    /// Start of the current tween.
    pub from: AngleSpan,
    /// Displayed span; overwritten on every advance.
    pub current: AngleSpan,
    /// Target span.
    pub to: AngleSpan,
    /// Label opacity at the start of the current tween.
    pub label_from: f64,
    /// Displayed label opacity.
    pub label_current: f64,
    /// Target label opacity.
    pub label_to: f64,
    seeded: bool,
}

impl NodeTween {
    /// Show `span` immediately, with nothing to animate.
    pub fn snap(&mut self, span: AngleSpan, label_opacity: f64) {
        self.from = span;
        self.current = span;
        self.to = span;
        self.label_from = label_opacity;
        self.label_current = label_opacity;
        self.label_to = label_opacity;
        self.seeded = true;
    }

    /// Adopt displayed state carried over from an earlier tree.
    pub fn carry(&mut self, previous: &NodeTween) {
        if previous.seeded {
            self.snap(previous.current, previous.label_current);
        }
    }

    /// Aim at a new target, starting from whatever is displayed now.
    ///
    /// A node that has never been displayed snaps to the target instead.
    pub fn retarget(&mut self, to: AngleSpan, label_opacity: f64) {
        if !self.seeded {
            self.snap(to, label_opacity);
            return;
        }
        self.from = self.current;
        self.to = to;
        self.label_from = self.label_current;
        self.label_to = label_opacity;
    }

    /// Move the displayed state to progress `t` of the current tween.
    pub fn advance(&mut self, t: f64) {
        self.current = interpolate(self.from, self.to)(t);
        self.label_current = lerp(self.label_from, self.label_to, t);
    }

    /// Whether the displayed state already equals the target.
    pub fn is_settled(&self) -> bool {
        self.current == self.to && self.label_current == self.label_to
    }

    /// Whether this node has ever been displayed.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

/// Single clock shared by every node's tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionClock {
    duration_ms: f64,
    started_ms: Option<f64>,
}

impl TransitionClock {
    /// A stopped clock with the given duration.
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            started_ms: None,
        }
    }

    /// Start (or restart) the clock at `now_ms`.
    pub fn start(&mut self, now_ms: f64) {
        self.started_ms = Some(now_ms);
    }

    /// Stop the clock.
    pub fn stop(&mut self) {
        self.started_ms = None;
    }

    /// Whether a transition is in flight.
    pub fn is_running(&self) -> bool {
        self.started_ms.is_some()
    }

    /// Linear elapsed fraction in `[0, 1]`; 1 when stopped.
    pub fn elapsed(&self, now_ms: f64) -> f64 {
        match self.started_ms {
            Some(start) if self.duration_ms > 0.0 => {
                ((now_ms - start) / self.duration_ms).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Eased progress at `now_ms`.
    pub fn progress(&self, now_ms: f64) -> f64 {
        ease_cubic_in_out(self.elapsed(now_ms))
    }
}

/// Target label opacity: shown only when the arc is wide enough to hold it.
pub fn label_opacity(span: AngleSpan, min_span: f64) -> f64 {
    if span.width() > min_span { 1.0 } else { 0.0 }
}

/// Label rotation in degrees for an arc span.
///
/// The mid angle in degrees is `(start + end) / π · 90`. Spokes labels run
/// outward and flip at the bottom half so text is never upside down; rim
/// labels run along the arc and flip between 120° and 270°.
pub fn label_rotation(span: AngleSpan, orientation: LabelOrientation) -> f64 {
    let angle = (span.start + span.end) / PI * 90.0;
    match orientation {
        LabelOrientation::Spokes => {
            if angle < 180.0 {
                angle - 90.0
            } else {
                angle + 90.0
            }
        }
        LabelOrientation::Rim => {
            if angle < 120.0 || angle > 270.0 {
                angle
            } else {
                angle + 180.0
            }
        }
    }
}

/// Position and rotation of a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelTransform {
    pub x: f64,
    pub y: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
}

impl LabelTransform {
    /// Derive the label transform from a (possibly interpolated) sector.
    pub fn for_sector(sector: &Sector, orientation: LabelOrientation) -> Self {
        let (x, y) = sector.centroid();
        Self {
            x,
            y,
            rotation: label_rotation(sector.angles(), orientation),
        }
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!(
            "translate({:.3},{:.3})rotate({:.3})",
            self.x, self.y, self.rotation
        )
    }
}
