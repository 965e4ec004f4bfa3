//! SVG output.

use std::fmt::Write as _;

use super::{ArcShape, LabelShape, RenderSurface};

/// Renders a frame into a standalone SVG document.
///
/// The viewport is `width × height` with a group translated to its center,
/// so chart coordinates (origin at the center) are used as-is.
#[derive(Debug, Default)]
pub struct SvgSurface {
    out: String,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The finished document.
    pub fn into_string(self) -> String {
        self.out
    }
}

impl RenderSurface for SvgSurface {
    fn begin(&mut self, width: f64, height: f64) {
        self.out.clear();
        let _ = write!(
            self.out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\"><g transform=\"translate({},{})\">",
            width / 2.0,
            height / 2.0
        );
    }

    fn arc(&mut self, arc: &ArcShape) {
        let _ = write!(
            self.out,
            "<path class=\"node\" data-key=\"{}\" d=\"{}\" fill=\"{}\" stroke=\"#fff\" opacity=\"{}\"><title>{}</title></path>",
            escape(arc.key.as_str()),
            arc.path,
            escape(&arc.fill),
            arc.opacity,
            escape(&arc.title)
        );
    }

    fn label(&mut self, label: &LabelShape) {
        let _ = write!(
            self.out,
            "<text class=\"label\" transform=\"{}\" dx=\"{}\" dy=\".35em\" fill-opacity=\"{}\">{}</text>",
            label.transform.to_svg(),
            label.dx,
            label.opacity,
            escape(&label.text)
        );
    }

    fn end(&mut self) {
        self.out.push_str("</g></svg>");
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::NodeKey;
    use crate::layout::arc::Sector;
    use crate::layout::transition::LabelTransform;
    use crate::render::Frame;

    #[test]
    fn test_svg_document() {
        let sector = Sector::new(0.0, std::f64::consts::PI / 2.0, 50.0, 100.0);
        let frame = Frame {
            width: 500.0,
            height: 400.0,
            arcs: vec![ArcShape {
                key: NodeKey::from("r/a"),
                depth: 1,
                path: sector.path(),
                fill: "rgb(51, 122, 183)".into(),
                title: "fish & chips".into(),
                opacity: 1.0,
                visible: true,
                sector,
            }],
            labels: vec![LabelShape {
                key: NodeKey::from("r/a"),
                text: "fish & chips".into(),
                transform: LabelTransform { x: 1.0, y: 2.0, rotation: 45.0 },
                dx: -30.0,
                opacity: 1.0,
                visible: true,
            }],
            ..Default::default()
        };

        let mut surface = SvgSurface::new();
        frame.draw(&mut surface);
        let svg = surface.into_string();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<g transform=\"translate(250,200)\">"));
        assert!(svg.contains("d=\"M0,-100A100,100,0,0,1,100,0L50,0A50,50,0,0,0,0,-50Z\""));
        assert!(svg.contains("stroke=\"#fff\""));
        assert!(svg.contains(">fish &amp; chips</text>"));
        assert!(svg.contains("<title>fish &amp; chips</title>"));
        assert!(svg.contains("transform=\"translate(1.000,2.000)rotate(45.000)\""));
        assert!(svg.ends_with("</g></svg>"));
    }

    #[test]
    fn test_invisible_shapes_skipped() {
        let frame = Frame {
            width: 10.0,
            height: 10.0,
            arcs: vec![ArcShape {
                key: NodeKey::from("r"),
                depth: 0,
                path: String::new(),
                fill: "#fff".into(),
                title: "r".into(),
                opacity: 1.0,
                visible: false,
                sector: Sector::default(),
            }],
            ..Default::default()
        };
        let mut surface = SvgSurface::new();
        frame.draw(&mut surface);
        assert!(!surface.into_string().contains("<path"));
    }
}
