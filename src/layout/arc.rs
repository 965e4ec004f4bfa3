//! Annular sector geometry.
//!
//! Angles are in radians, measured clockwise from twelve o'clock, so a point
//! at angle `a` and radius `r` sits at `(r·sin a, −r·cos a)` relative to the
//! chart center (screen y grows downward).

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use serde::Serialize;

/// A pair of angles bounding an arc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AngleSpan {
    /// Start angle (radians).
    pub start: f64,
    /// End angle (radians).
    pub end: f64,
}

impl AngleSpan {
    /// Create a span.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Angular width.
    #[inline]
    pub fn width(self) -> f64 {
        self.end - self.start
    }

    /// Midpoint angle.
    #[inline]
    pub fn mid(self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// An annular sector: angular span plus radial band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Sector {
    pub angle_start: f64,
    pub angle_end: f64,
    pub radius_inner: f64,
    pub radius_outer: f64,
}

impl Sector {
    /// Create a sector.
    pub fn new(angle_start: f64, angle_end: f64, radius_inner: f64, radius_outer: f64) -> Self {
        Self {
            angle_start,
            angle_end,
            radius_inner,
            radius_outer,
        }
    }

    /// The angular span.
    pub fn angles(&self) -> AngleSpan {
        AngleSpan::new(self.angle_start, self.angle_end)
    }

    /// Same radial band with different angles.
    pub fn with_angles(&self, span: AngleSpan) -> Self {
        Self {
            angle_start: span.start,
            angle_end: span.end,
            ..*self
        }
    }

    /// Label anchor: the point at the mid angle and mid radius.
    pub fn centroid(&self) -> (f64, f64) {
        let r = (self.radius_inner + self.radius_outer) / 2.0;
        point(r, (self.angle_start + self.angle_end) / 2.0)
    }

    /// SVG path data for the closed sector. Empty for a zero-width or
    /// zero-thickness sector.
    pub fn path(&self) -> String {
        let (a0, a1) = ordered(self.angle_start, self.angle_end);
        let (r0, r1) = ordered(self.radius_inner, self.radius_outer);
        let sweep = a1 - a0;
        if sweep <= f64::EPSILON || r1 <= f64::EPSILON {
            return String::new();
        }

        let mut d = String::new();
        if sweep >= TAU - 1e-9 {
            // A full ring is two half arcs; a single arc cannot close on itself
            let _ = write!(
                d,
                "M{},{}A{r1},{r1},0,1,1,{},{}A{r1},{r1},0,1,1,{},{}",
                coord(0.0),
                coord(-r1),
                coord(0.0),
                coord(r1),
                coord(0.0),
                coord(-r1)
            );
            if r0 > f64::EPSILON {
                let _ = write!(
                    d,
                    "M{},{}A{r0},{r0},0,1,0,{},{}A{r0},{r0},0,1,0,{},{}",
                    coord(0.0),
                    coord(-r0),
                    coord(0.0),
                    coord(r0),
                    coord(0.0),
                    coord(-r0)
                );
            }
            d.push('Z');
            return d;
        }

        let large = if sweep > PI { 1 } else { 0 };
        let (x0, y0) = point(r1, a0);
        let (x1, y1) = point(r1, a1);
        let _ = write!(
            d,
            "M{},{}A{},{},0,{large},1,{},{}",
            coord(x0),
            coord(y0),
            coord(r1),
            coord(r1),
            coord(x1),
            coord(y1)
        );
        if r0 > f64::EPSILON {
            let (x2, y2) = point(r0, a1);
            let (x3, y3) = point(r0, a0);
            let _ = write!(
                d,
                "L{},{}A{},{},0,{large},0,{},{}",
                coord(x2),
                coord(y2),
                coord(r0),
                coord(r0),
                coord(x3),
                coord(y3)
            );
        } else {
            d.push_str("L0,0");
        }
        d.push('Z');
        d
    }

    /// Axis-aligned bounding box `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (a0, a1) = ordered(self.angle_start, self.angle_end);
        let (r0, r1) = ordered(self.radius_inner, self.radius_outer);

        let mut xs = Vec::with_capacity(8);
        let mut ys = Vec::with_capacity(8);
        for (x, y) in [point(r0, a0), point(r0, a1), point(r1, a0), point(r1, a1)] {
            xs.push(x);
            ys.push(y);
        }
        // Extremes also occur where the arc crosses a compass direction
        let first = (a0 / (PI / 2.0)).ceil() as i64;
        let last = (a1 / (PI / 2.0)).floor() as i64;
        for k in first..=last.min(first + 4) {
            let (x, y) = point(r1, k as f64 * PI / 2.0);
            xs.push(x);
            ys.push(y);
        }

        let min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
        let max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min(&xs), min(&ys), max(&xs), max(&ys))
    }

    /// Whether the point `(x, y)` (relative to the center) lies in the sector.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (a0, a1) = ordered(self.angle_start, self.angle_end);
        let (r0, r1) = ordered(self.radius_inner, self.radius_outer);
        if a1 - a0 <= f64::EPSILON {
            return false;
        }

        let r = (x * x + y * y).sqrt();
        if r < r0 || r > r1 {
            return false;
        }
        let mut angle = x.atan2(-y);
        if angle < 0.0 {
            angle += TAU;
        }
        if a1 - a0 >= TAU - 1e-9 {
            return true;
        }
        // Spans may start anywhere; compare modulo a full turn
        let offset = (angle - a0).rem_euclid(TAU);
        offset <= a1 - a0
    }
}

/// Cartesian point at radius `r` and clockwise-from-top angle `a`.
#[inline]
pub fn point(r: f64, a: f64) -> (f64, f64) {
    (r * a.sin(), -r * a.cos())
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Format a coordinate compactly, snapping float noise to zero.
fn coord(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_centroid_quarter() {
        // First quadrant (top → right), band 100..200
        let sector = Sector::new(0.0, PI / 2.0, 100.0, 200.0);
        let (x, y) = sector.centroid();
        let expected = 150.0 * (PI / 4.0).sin();
        assert!(approx(x, expected), "x = {x}");
        assert!(approx(y, -expected), "y = {y}");
    }

    #[test]
    fn test_centroid_bottom() {
        let sector = Sector::new(PI - 0.1, PI + 0.1, 0.0, 100.0);
        let (x, y) = sector.centroid();
        assert!(approx(x, 0.0));
        assert!(approx(y, 50.0));
    }

    #[test]
    fn test_path_annular() {
        let sector = Sector::new(0.0, PI / 2.0, 50.0, 100.0);
        assert_eq!(sector.path(), "M0,-100A100,100,0,0,1,100,0L50,0A50,50,0,0,0,0,-50Z");
    }

    #[test]
    fn test_path_pie_slice_and_large_arc() {
        let pie = Sector::new(0.0, PI / 2.0, 0.0, 10.0);
        assert_eq!(pie.path(), "M0,-10A10,10,0,0,1,10,0L0,0Z");

        let large = Sector::new(0.0, 1.5 * PI, 5.0, 10.0);
        assert!(large.path().contains("A10,10,0,1,1"));
    }

    #[test]
    fn test_path_empty_for_zero_width() {
        assert_eq!(Sector::new(1.0, 1.0, 10.0, 20.0).path(), "");
        assert_eq!(Sector::new(0.0, 1.0, 0.0, 0.0).path(), "");
    }

    #[test]
    fn test_path_full_ring() {
        let ring = Sector::new(0.0, TAU, 10.0, 20.0);
        let d = ring.path();
        assert!(d.starts_with("M0,-20A20,20,0,1,1,0,20"));
        assert!(d.contains("M0,-10"));
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn test_bounds_include_compass_crossings() {
        // Span wrapping past twelve o'clock
        let sector = Sector::new(5.8, 6.8, 0.0, 100.0);
        let (_, min_y, _, _) = sector.bounds();
        assert!(approx(min_y, -100.0), "top crossing not included: {min_y}");

        let quarter = Sector::new(0.0, PI / 2.0, 50.0, 100.0);
        let (min_x, min_y, max_x, max_y) = quarter.bounds();
        assert!(approx(min_x, 0.0));
        assert!(approx(min_y, -100.0));
        assert!(approx(max_x, 100.0));
        assert!(approx(max_y, 0.0));
    }

    #[test]
    fn test_contains() {
        let sector = Sector::new(0.0, PI / 2.0, 50.0, 100.0);
        let (x, y) = point(75.0, PI / 4.0);
        assert!(sector.contains(x, y));

        let (x, y) = point(25.0, PI / 4.0);
        assert!(!sector.contains(x, y), "inside the hole");

        let (x, y) = point(75.0, PI);
        assert!(!sector.contains(x, y), "wrong angle");

        assert!(!Sector::new(1.0, 1.0, 0.0, 100.0).contains(0.0, -50.0));
    }

    #[test]
    fn test_angle_span() {
        let span = AngleSpan::new(PI / 2.0, 3.0 * PI / 2.0);
        assert!(approx(span.width(), PI));
        assert!(approx(span.mid(), PI));
    }
}
