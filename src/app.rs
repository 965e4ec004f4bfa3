//! SunburstApp - the single owner of chart state.
//!
//! Holds the current tree, filter, selection, text panel, request
//! generations and the transition clock. Every user or host event is a
//! method call; nothing lives in globals.
//!
//! Load sequence for a topic document:
//! 1. Build the tree and lay it out unfiltered. That layout fixes colors and
//!    the angles a brand-new node starts from.
//! 2. Nodes that were already on screen keep their displayed angles instead.
//! 3. Apply the active filter, lay out again and animate toward it.

use std::f64::consts::TAU;

use crate::config::{SunburstConfig, TopFilter};
use crate::corpus::{CorpusHeader, Generation, RequestTracker};
use crate::error::{Result, SunburstError};
use crate::hierarchy::{HierarchyTree, NodeKey, TopicDocument, WeightingRule};
use crate::layout::partition::{PartitionConfig, PartitionLayout};
use crate::layout::transition::{label_opacity, TransitionClock};
use crate::reconcile::{reconcile, Reconciliation};
use crate::render::{ColorScale, Frame, SvgSurface};
use crate::selection::{detail_label, SelectionController, TextCollection, TextPanel};
use crate::spatial::{ArcEntry, ArcHitIndex};

const ROOT_FILL: &str = "white";

/// View-model for one sunburst chart.
pub struct SunburstApp {
    config: SunburstConfig,
    layout: PartitionLayout,
    colors: ColorScale,
    requests: RequestTracker,
    filter: TopFilter,

    tree: Option<HierarchyTree>,
    header: Option<CorpusHeader>,
    texts: Option<TextCollection>,

    selection: SelectionController,
    panel: TextPanel,

    clock: TransitionClock,
    hits: ArcHitIndex,

    /// Node keys entered/kept/removed by the last topic load
    nodes: Reconciliation<NodeKey>,

    last_error: Option<SunburstError>,
}

impl SunburstApp {
    /// Create an app. Fails fast on invalid configuration.
    pub fn new(config: SunburstConfig) -> Result<Self> {
        config.validate()?;
        let colors = ColorScale::new(&config.color_stops)?;

        Ok(Self {
            layout: PartitionLayout::new(PartitionConfig {
                radius: config.radius(),
                scale: config.radial_scale,
            }),
            colors,
            requests: RequestTracker::new(),
            filter: config.default_filter,
            tree: None,
            header: None,
            texts: None,
            selection: SelectionController::new(),
            panel: TextPanel::default(),
            clock: TransitionClock::new(config.transition_ms),
            hits: ArcHitIndex::new(),
            nodes: Reconciliation::default(),
            last_error: None,
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SunburstConfig {
        &self.config
    }

    pub fn filter(&self) -> TopFilter {
        self.filter
    }

    pub fn tree(&self) -> Option<&HierarchyTree> {
        self.tree.as_ref()
    }

    /// Header of the displayed corpus.
    pub fn header(&self) -> Option<&CorpusHeader> {
        self.header.as_ref()
    }

    /// Corpus loaded when the page opens.
    pub fn initial_corpus(&self) -> &str {
        self.config.corpora.first().map_or("", String::as_str)
    }

    pub fn selected(&self) -> Option<&NodeKey> {
        self.selection.selected()
    }

    /// The text panel for the current selection.
    pub fn panel(&self) -> &TextPanel {
        &self.panel
    }

    /// `Topic: '<name>'` while something is selected, empty otherwise.
    pub fn topic_label(&self) -> &str {
        &self.panel.title
    }

    /// The most recent user-visible failure. Cleared on corpus change, or when
    /// the topic file that failed loads.
    pub fn last_error(&self) -> Option<&SunburstError> {
        self.last_error.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.clock.is_running()
    }

    // =========================================================================
    // Corpus loading
    // =========================================================================

    /// Switch to another corpus. Returns the generation the host must pass
    /// back with both fetch results.
    ///
    /// The current chart stays up until the new topics arrive; the selection
    /// and the text panel are cleared immediately.
    pub fn select_corpus(&mut self, name: &str) -> Result<Generation> {
        let corpus = self.config.corpus(name)?.to_string();
        let generation = self.requests.begin(&corpus);

        match self.tree.as_mut() {
            Some(tree) => self.selection.reset(tree),
            None => self.selection.clear(),
        }
        self.texts = None;
        self.panel = self.panel.cleared();
        self.last_error = None;

        log::info!("Selecting corpus {} (generation {})", corpus, generation.0);
        Ok(generation)
    }

    /// Topic file path for a corpus.
    pub fn topics_path(&self, name: &str) -> Result<String> {
        Ok(self.config.topics_path(self.config.corpus(name)?))
    }

    /// Text file path for a corpus.
    pub fn texts_path(&self, name: &str) -> Result<String> {
        Ok(self.config.texts_path(self.config.corpus(name)?))
    }

    /// Apply a fetched topic document.
    ///
    /// Returns `Ok(false)` for a stale generation. A parse failure leaves the
    /// previous chart in place and is recorded in `last_error`.
    pub fn load_topics(&mut self, generation: Generation, json: &str, now_ms: f64) -> Result<bool> {
        if !self.requests.accepts(generation) {
            return Ok(false);
        }
        let resource = self.config.topics_path(self.requests.corpus().unwrap_or_default());
        let doc = match TopicDocument::from_json(&resource, json) {
            Ok(doc) => doc,
            Err(err) => return Err(self.fail(err)),
        };

        let header = CorpusHeader::from_document(&doc);
        let mut tree = HierarchyTree::build(doc.root, self.config.weight_metric);
        self.layout.compute(&mut tree);

        let min_span = self.config.label_min_span;
        let previous = self.tree.as_ref();
        for node in tree.nodes_mut() {
            if node.depth == 0 {
                node.fill = ROOT_FILL.to_string();
                node.state.set_hidden(true);
            } else {
                node.fill = self.colors.at(node.arc.angle_start / TAU).to_css();
            }

            let carried = previous
                .and_then(|p| p.get(&node.key))
                .map(|p| p.tween)
                .filter(|t| t.is_seeded());
            match carried {
                Some(displayed) => node.tween.carry(&displayed),
                None => {
                    let span = node.arc.angles();
                    node.tween.snap(span, label_opacity(span, min_span));
                }
            }
        }

        let before = previous.map(keys_in_order).unwrap_or_default();
        self.nodes = reconcile(&before, &keys_in_order(&tree), |k| k.clone());

        log::info!(
            "Loaded corpus {} ({} nodes, {} entered, {} exited)",
            header.name,
            tree.node_count(),
            self.nodes.entered.len(),
            self.nodes.exited.len()
        );

        self.tree = Some(tree);
        self.header = Some(header);
        self.selection.clear();
        self.panel = self.panel.cleared();
        // A text failure for this generation stays visible
        let topics_failed = matches!(
            &self.last_error,
            Some(SunburstError::DataFetch { resource: failed, .. }) if *failed == resource
        );
        if topics_failed {
            self.last_error = None;
        }
        self.relayout(now_ms);
        Ok(true)
    }

    /// Apply a fetched text file. Returns `Ok(false)` for a stale generation.
    pub fn load_texts(&mut self, generation: Generation, json: &str) -> Result<bool> {
        if !self.requests.accepts(generation) {
            return Ok(false);
        }
        let resource = self.config.texts_path(self.requests.corpus().unwrap_or_default());
        let texts = match TextCollection::from_json(&resource, json) {
            Ok(texts) => texts,
            Err(err) => return Err(self.fail(err)),
        };

        log::info!("Loaded {} texts from {}", texts.len(), resource);
        self.texts = Some(texts);
        if self.selection.selected().is_some() {
            self.refresh_panel();
        }
        Ok(true)
    }

    /// Record a fetch failure reported by the host. Returns false if the
    /// generation is stale and the report was ignored.
    pub fn report_fetch_error(&mut self, generation: Generation, message: &str) -> bool {
        if !self.requests.accepts(generation) {
            return false;
        }
        let resource = self.requests.corpus().unwrap_or_default().to_string();
        self.fail(SunburstError::DataFetch {
            resource,
            message: message.to_string(),
        });
        true
    }

    fn fail(&mut self, err: SunburstError) -> SunburstError {
        log::warn!("{err}");
        if err.is_user_visible() {
            self.last_error = Some(err.clone());
        }
        err
    }

    // =========================================================================
    // Filtering and animation
    // =========================================================================

    /// Change the top-N filter and animate to the new layout.
    pub fn set_filter(&mut self, option: &str, now_ms: f64) -> Result<()> {
        self.filter = self.config.filter(option)?;
        log::debug!("Filter changed to {}", self.filter);
        self.relayout(now_ms);
        Ok(())
    }

    /// Re-weight under the active filter and start tweening toward it.
    fn relayout(&mut self, now_ms: f64) {
        let Some(tree) = self.tree.as_mut() else {
            return;
        };
        let metric = tree.metric();
        tree.apply_weighting(WeightingRule {
            metric,
            filter: self.filter,
        });
        let visible = self.layout.compute(tree);
        if let Err(err) = self.selection.reapply(tree) {
            log::warn!("Selection dropped after re-layout: {err}");
            self.panel = self.panel.cleared();
        }

        let min_span = self.config.label_min_span;
        for node in tree.nodes_mut() {
            let target = node.arc.angles();
            node.tween.retarget(target, label_opacity(target, min_span));
        }
        self.clock.start(now_ms);
        log::debug!("Layout under {}: {} visible arcs", self.filter, visible);
        self.rebuild_hits();
    }

    /// Advance the running transition to `now_ms`. Returns true while it is
    /// still in flight.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.clock.is_running() {
            return false;
        }
        let t = self.clock.progress(now_ms);
        let done = self.clock.elapsed(now_ms) >= 1.0;

        if let Some(tree) = self.tree.as_mut() {
            for node in tree.nodes_mut() {
                node.tween.advance(t);
            }
        }
        if done {
            self.clock.stop();
        }
        self.rebuild_hits();
        !done
    }

    fn rebuild_hits(&mut self) {
        let Some(tree) = self.tree.as_ref() else {
            self.hits.clear();
            return;
        };
        let entries = tree
            .nodes()
            .filter(|n| !n.state.is_hidden())
            .map(|n| ArcEntry::new(n.key.clone(), n.depth, n.arc.with_angles(n.tween.current)))
            .collect();
        self.hits.rebuild(entries);
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Handle a click on a node.
    ///
    /// On a selection error the chart is reset to the unselected baseline and
    /// the error returned.
    pub fn click(&mut self, key: &NodeKey) -> Result<()> {
        let Some(tree) = self.tree.as_mut() else {
            self.panel = self.panel.cleared();
            return Err(self.fail(SunburstError::Selection("no chart is loaded".into())));
        };

        match self.selection.click(tree, key) {
            Ok(Some(_)) => {
                self.refresh_panel();
                Ok(())
            }
            Ok(None) => {
                self.panel = self.panel.cleared();
                Ok(())
            }
            Err(err) => {
                self.panel = self.panel.cleared();
                Err(self.fail(err))
            }
        }
    }

    /// Handle a click at viewport coordinates. Returns the clicked node, or
    /// None if the point is on no arc.
    pub fn click_at(&mut self, x: f64, y: f64) -> Result<Option<NodeKey>> {
        let cx = x - self.config.width / 2.0;
        let cy = y - self.config.height / 2.0;
        let Some(key) = self.hits.hit(cx, cy).cloned() else {
            return Ok(None);
        };
        self.click(&key)?;
        Ok(Some(key))
    }

    fn refresh_panel(&mut self) {
        let topic = self
            .selection
            .selected()
            .and_then(|key| self.tree.as_ref()?.get(key))
            .map(|node| &node.topic);
        let Some(topic) = topic else {
            self.panel = self.panel.cleared();
            return;
        };

        let cards = match &self.texts {
            Some(texts) => texts.cards_for(topic),
            None => {
                log::warn!("Texts are not loaded yet; showing no cards for '{}'", topic.name);
                Vec::new()
            }
        };
        self.panel = self.panel.next(detail_label(&topic.name), cards);
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// The current frame at displayed angles.
    pub fn frame(&self) -> Frame {
        match &self.tree {
            Some(tree) => Frame::build(tree, &self.config, self.nodes.clone(), self.clock.is_running()),
            None => Frame {
                width: self.config.width,
                height: self.config.height,
                ..Default::default()
            },
        }
    }

    /// The current frame as an SVG document.
    pub fn render_svg(&self) -> String {
        let mut surface = SvgSurface::new();
        self.frame().draw(&mut surface);
        surface.into_string()
    }
}

fn keys_in_order(tree: &HierarchyTree) -> Vec<NodeKey> {
    tree.descendants()
        .into_iter()
        .filter_map(|i| tree.node(i).map(|n| n.key.clone()))
        .collect()
}
