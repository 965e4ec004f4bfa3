//! Selection and highlighting.
//!
//! A click selects a node (or toggles it off). The selected node and its
//! ancestors stay at full opacity while everything else is dimmed, and the
//! text panel lists the source texts mentioning the selected topic.

mod controller;
mod texts;

pub use controller::{SelectionController, SelectionState};
pub use texts::{highlight_verbatims, topic_class, TextCard, TextCollection, TextPanel, TextRecord};

/// Heading shown above the text panel for a selected topic.
pub fn detail_label(name: &str) -> String {
    format!("Topic: '{name}'")
}
