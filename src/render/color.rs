//! Piecewise-linear color scale over `[0, 1]`.

use crate::error::{Result, SunburstError};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#rrggbb` or `#rgb`.
    pub fn parse(css: &str) -> Result<Self> {
        let invalid = || SunburstError::Configuration(format!("invalid color '{css}'"));
        let hex = css
            .trim()
            .strip_prefix('#')
            .filter(|h| h.is_ascii())
            .ok_or_else(invalid)?;
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// CSS `rgb(r, g, b)` form.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Evenly spaced color stops, interpolated channel by channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    stops: Vec<Rgb>,
}

impl ColorScale {
    pub fn new(stops: &[String]) -> Result<Self> {
        if stops.is_empty() {
            return Err(SunburstError::Configuration("color scale needs at least one stop".into()));
        }
        let stops = stops.iter().map(|s| Rgb::parse(s)).collect::<Result<Vec<_>>>()?;
        Ok(Self { stops })
    }

    /// Color at position `t` (clamped to `[0, 1]`).
    pub fn at(&self, t: f64) -> Rgb {
        let last = self.stops.len() - 1;
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if last == 0 {
            return self.stops[0];
        }
        let scaled = t * last as f64;
        let i = (scaled.floor() as usize).min(last - 1);
        let local = scaled - i as f64;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * local).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> ColorScale {
        ColorScale::new(&["#337ab7".into(), "#d3d3d3".into(), "#464545".into()]).unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(Rgb::parse("#337ab7").unwrap(), Rgb(0x33, 0x7a, 0xb7));
        assert_eq!(Rgb::parse("#fff").unwrap(), Rgb(255, 255, 255));
        assert!(Rgb::parse("337ab7").is_err());
        assert!(Rgb::parse("#12345").is_err());
        assert!(Rgb::parse("#gg0000").is_err());
    }

    #[test]
    fn test_stops_and_midpoints() {
        let scale = scale();
        assert_eq!(scale.at(0.0), Rgb(0x33, 0x7a, 0xb7));
        assert_eq!(scale.at(0.5), Rgb(0xd3, 0xd3, 0xd3));
        assert_eq!(scale.at(1.0), Rgb(0x46, 0x45, 0x45));
        assert_eq!(scale.at(2.0), scale.at(1.0));
        // Halfway between the first two stops
        assert_eq!(scale.at(0.25), Rgb(131, 167, 197));
        assert_eq!(scale.at(0.25).to_css(), "rgb(131, 167, 197)");
    }

    #[test]
    fn test_single_stop() {
        let scale = ColorScale::new(&["#000000".into()]).unwrap();
        assert_eq!(scale.at(0.7), Rgb(0, 0, 0));
        assert!(ColorScale::new(&[]).is_err());
    }
}
