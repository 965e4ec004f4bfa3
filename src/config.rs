//! Engine configuration.
//!
//! Every field has a default, so the host may pass a partial JSON object (or
//! nothing at all). `validate` rejects values the engine cannot work with;
//! it runs once during construction so misconfiguration fails fast.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SunburstError};
use crate::layout::partition::RadialScale;

/// The "top-N" topic filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TopFilter {
    /// Every node contributes its full weight.
    All,
    /// Only nodes ranked `1..=n` contribute; everything else weighs zero.
    Top(u32),
}

impl TopFilter {
    /// Whether a node with the given rank contributes weight under this filter.
    ///
    /// Ranks are 1-based. A missing or zero rank counts as unranked, which is
    /// included by `All` and excluded by every `Top(n)`.
    pub fn includes(self, rank: Option<u32>) -> bool {
        match self {
            Self::All => true,
            Self::Top(n) => matches!(rank, Some(r) if r >= 1 && r <= n),
        }
    }
}

impl fmt::Display for TopFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Top(n) => write!(f, "top{n}"),
        }
    }
}

impl FromStr for TopFilter {
    type Err = SunburstError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        if s == "all" {
            return Ok(Self::All);
        }
        s.strip_prefix("top")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .map(Self::Top)
            .ok_or_else(|| SunburstError::Configuration(format!("unknown filter option '{s}'")))
    }
}

impl TryFrom<String> for TopFilter {
    type Error = SunburstError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TopFilter> for String {
    fn from(filter: TopFilter) -> Self {
        filter.to_string()
    }
}

/// Which topic field drives arc weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMetric {
    /// The `size` field.
    #[default]
    Size,
    /// The `textCount` field.
    TextCount,
}

/// How labels are rotated relative to their arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelOrientation {
    /// Text runs outward along the radius.
    #[default]
    Spokes,
    /// Text runs along the arc.
    Rim,
}

/// Configuration for the sunburst engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunburstConfig {
    /// Viewport width in pixels (default: 500).
    pub width: f64,
    /// Viewport height in pixels (default: 500).
    pub height: f64,
    /// Transition duration in milliseconds (default: 750).
    pub transition_ms: f64,
    /// Opacity of nodes off the selected path (default: 0.4).
    pub dim_opacity: f64,
    /// Minimum arc span in radians for a label to be shown (default: 0.07).
    pub label_min_span: f64,
    /// Number of leading words of a node name used as its label (default: 2).
    pub label_words: usize,
    /// Horizontal label offset in pixels (default: -30).
    pub label_offset_x: f64,
    /// Label rotation rule (default: spokes).
    pub label_orientation: LabelOrientation,
    /// Field used for arc weight (default: size).
    pub weight_metric: WeightMetric,
    /// Band spacing along the radius (default: linear).
    pub radial_scale: RadialScale,
    /// Filters offered to the user.
    pub filter_options: Vec<TopFilter>,
    /// Filter applied on first load (default: top10).
    pub default_filter: TopFilter,
    /// Corpus names offered to the user; the first is loaded initially.
    pub corpora: Vec<String>,
    /// Topic file path; `{corpus}` is replaced with the corpus name.
    pub topics_path_template: String,
    /// Text file path; `{corpus}` is replaced with the corpus name.
    pub texts_path_template: String,
    /// Three CSS colors for the fill scale at 0, 0.5 and 1.
    pub color_stops: [String; 3],
}

impl Default for SunburstConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            height: 500.0,
            transition_ms: 750.0,
            dim_opacity: 0.4,
            label_min_span: 0.07,
            label_words: 2,
            label_offset_x: -30.0,
            label_orientation: LabelOrientation::Spokes,
            weight_metric: WeightMetric::Size,
            radial_scale: RadialScale::Linear,
            filter_options: vec![
                TopFilter::All,
                TopFilter::Top(5),
                TopFilter::Top(7),
                TopFilter::Top(10),
            ],
            default_filter: TopFilter::Top(10),
            corpora: vec!["Hosea".into(), "Jonah".into(), "Luke".into()],
            topics_path_template: "Data/Topics-{corpus}.json".into(),
            texts_path_template: "Data/Texts-{corpus}.json".into(),
            color_stops: ["#337ab7".into(), "#d3d3d3".into(), "#464545".into()],
        }
    }
}

impl SunburstConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SunburstError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Outer radius of the chart: half the smaller viewport side.
    pub fn radius(&self) -> f64 {
        self.width.min(self.height) / 2.0
    }

    /// Check every value the engine depends on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SunburstError::Configuration(msg));

        if !(self.width > 0.0 && self.height > 0.0) {
            return invalid(format!(
                "viewport must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if !(self.transition_ms > 0.0) {
            return invalid(format!(
                "transition duration must be positive, got {}",
                self.transition_ms
            ));
        }
        if !(0.0..=1.0).contains(&self.dim_opacity) {
            return invalid(format!(
                "dim opacity must be within [0, 1], got {}",
                self.dim_opacity
            ));
        }
        if self.label_words == 0 {
            return invalid("label_words must be at least 1".into());
        }
        if self.filter_options.is_empty() {
            return invalid("at least one filter option is required".into());
        }
        if !self.filter_options.contains(&self.default_filter) {
            return invalid(format!(
                "default filter '{}' is not among the filter options",
                self.default_filter
            ));
        }
        if self.corpora.is_empty() {
            return invalid("at least one corpus is required".into());
        }
        if let Some(blank) = self.corpora.iter().find(|c| c.trim().is_empty()) {
            return invalid(format!("corpus name '{blank}' is blank"));
        }
        Ok(())
    }

    /// Resolve a filter option chosen by the user.
    pub fn filter(&self, option: &str) -> Result<TopFilter> {
        let filter: TopFilter = option.parse()?;
        if self.filter_options.contains(&filter) {
            Ok(filter)
        } else {
            Err(SunburstError::Configuration(format!(
                "filter '{filter}' is not offered"
            )))
        }
    }

    /// Resolve a corpus chosen by the user.
    pub fn corpus(&self, name: &str) -> Result<&str> {
        self.corpora
            .iter()
            .find(|c| c.as_str() == name)
            .map(String::as_str)
            .ok_or_else(|| SunburstError::Configuration(format!("unknown corpus '{name}'")))
    }

    /// Topic file path for a corpus.
    pub fn topics_path(&self, corpus: &str) -> String {
        self.topics_path_template.replace("{corpus}", corpus)
    }

    /// Text file path for a corpus.
    pub fn texts_path(&self, corpus: &str) -> String {
        self.texts_path_template.replace("{corpus}", corpus)
    }
}
