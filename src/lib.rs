//! Topic Sunburst - WASM Module
//!
//! This module provides the layout, transition and selection engines for
//! the topic sunburst chart. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen; the host fetches data files,
//! forwards user input and draws the frames.
//!
//! # Architecture
//!
//! - `hierarchy`: Topic tree using petgraph's StableGraph
//! - `layout`: Radial partition, arc geometry and transition tweening
//! - `selection`: Click state machine, text filtering and highlighting
//! - `spatial`: R-tree arc index for pointer hit testing
//! - `corpus`: Generation tokens for in-flight fetches, corpus header
//! - `render`: Frame description, color scale and SVG surface
//! - `app`: The single owner of chart state

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

pub mod app;
pub mod config;
pub mod corpus;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod reconcile;
pub mod render;
pub mod selection;
pub mod spatial;

use app::SunburstApp;
use config::SunburstConfig;
use corpus::Generation;
use error::SunburstError;
use hierarchy::NodeKey;

/// Initialize the WASM module: route `log` records to the browser console
/// and panics to `console.error`.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();
}

impl From<SunburstError> for JsValue {
    fn from(err: SunburstError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Main entry point for the sunburst chart.
///
/// This struct wraps the internal SunburstApp and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct TopicSunburstWasm {
    app: SunburstApp,
}

#[wasm_bindgen]
impl TopicSunburstWasm {
    /// Create a chart from an optional JSON configuration.
    ///
    /// Missing fields take their defaults. Throws on invalid configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<TopicSunburstWasm, JsValue> {
        let config = match config_json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => SunburstConfig::from_json(json)?,
            _ => SunburstConfig::default(),
        };
        Ok(Self {
            app: SunburstApp::new(config)?,
        })
    }

    // =========================================================================
    // Corpus Loading
    // =========================================================================

    /// Corpus names offered to the user.
    pub fn corpora(&self) -> Vec<String> {
        self.app.config().corpora.clone()
    }

    /// The corpus to load when the page opens.
    #[wasm_bindgen(js_name = initialCorpus)]
    pub fn initial_corpus(&self) -> String {
        self.app.initial_corpus().to_string()
    }

    /// Switch corpus.
    ///
    /// Returns the generation token to pass back with both fetch results.
    #[wasm_bindgen(js_name = selectCorpus)]
    pub fn select_corpus(&mut self, name: &str) -> Result<u32, JsValue> {
        Ok(self.app.select_corpus(name)?.0)
    }

    /// Path of the topic file for a corpus.
    #[wasm_bindgen(js_name = topicsPath)]
    pub fn topics_path(&self, name: &str) -> Result<String, JsValue> {
        Ok(self.app.topics_path(name)?)
    }

    /// Path of the text file for a corpus.
    #[wasm_bindgen(js_name = textsPath)]
    pub fn texts_path(&self, name: &str) -> Result<String, JsValue> {
        Ok(self.app.texts_path(name)?)
    }

    /// Apply a fetched topic document.
    ///
    /// Returns false if the response belongs to a superseded request.
    #[wasm_bindgen(js_name = loadTopics)]
    pub fn load_topics(&mut self, generation: u32, json: &str, now_ms: f64) -> Result<bool, JsValue> {
        Ok(self.app.load_topics(Generation(generation), json, now_ms)?)
    }

    /// Apply a fetched text file.
    ///
    /// Returns false if the response belongs to a superseded request.
    #[wasm_bindgen(js_name = loadTexts)]
    pub fn load_texts(&mut self, generation: u32, json: &str) -> Result<bool, JsValue> {
        Ok(self.app.load_texts(Generation(generation), json)?)
    }

    /// Report a failed fetch so it shows as the current error.
    #[wasm_bindgen(js_name = reportFetchError)]
    pub fn report_fetch_error(&mut self, generation: u32, message: &str) -> bool {
        self.app.report_fetch_error(Generation(generation), message)
    }

    // =========================================================================
    // Filtering and Animation
    // =========================================================================

    /// Filter options offered to the user (`all`, `top5`, ...).
    #[wasm_bindgen(js_name = filterOptions)]
    pub fn filter_options(&self) -> Vec<String> {
        self.app
            .config()
            .filter_options
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// The active filter.
    pub fn filter(&self) -> String {
        self.app.filter().to_string()
    }

    /// Change the top-N filter and start animating toward the new layout.
    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&mut self, option: &str, now_ms: f64) -> Result<(), JsValue> {
        Ok(self.app.set_filter(option, now_ms)?)
    }

    /// Advance the animation. Returns true while it is still running.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.app.tick(now_ms)
    }

    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        self.app.is_animating()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Click a node by key.
    #[wasm_bindgen(js_name = clickNode)]
    pub fn click_node(&mut self, key: &str) -> Result<(), JsValue> {
        Ok(self.app.click(&NodeKey::from(key))?)
    }

    /// Click at viewport coordinates. Returns the key of the node hit.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        Ok(self.app.click_at(x, y)?.map(|key| key.0))
    }

    /// Key of the selected node.
    #[wasm_bindgen(js_name = selectedKey)]
    pub fn selected_key(&self) -> Option<String> {
        self.app.selected().map(ToString::to_string)
    }

    /// Detail heading for the selection (`Topic: '<name>'`), or empty.
    #[wasm_bindgen(js_name = topicLabel)]
    pub fn topic_label(&self) -> String {
        self.app.topic_label().to_string()
    }

    /// The text panel: title, cards and the card diff.
    #[wasm_bindgen(js_name = selectedTexts)]
    pub fn selected_texts(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.app.panel())?)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The current frame: arcs, labels and the node diff.
    pub fn frame(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.app.frame())?)
    }

    /// The current frame as an SVG document.
    #[wasm_bindgen(js_name = renderSvg)]
    pub fn render_svg(&self) -> String {
        self.app.render_svg()
    }

    /// Displayed angles as [start0, end0, start1, end1, ...] in frame order.
    #[wasm_bindgen(js_name = displayedAngles)]
    pub fn displayed_angles(&self) -> Float64Array {
        let frame = self.app.frame();
        let mut angles = Vec::with_capacity(frame.arcs.len() * 2);
        for arc in &frame.arcs {
            angles.push(arc.sector.angle_start);
            angles.push(arc.sector.angle_end);
        }
        Float64Array::from(&angles[..])
    }

    /// Header of the displayed corpus.
    #[wasm_bindgen(js_name = corpusHeader)]
    pub fn corpus_header(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.app.header())?)
    }

    /// "As of" label of the displayed corpus.
    #[wasm_bindgen(js_name = corpusAsOf)]
    pub fn corpus_as_of(&self) -> Option<String> {
        self.app.header().and_then(|h| h.as_of())
    }

    /// The latest user-visible error message.
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.app.last_error().map(ToString::to_string)
    }
}
