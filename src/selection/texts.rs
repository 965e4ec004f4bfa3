//! Source texts and the side panel listing them.

use std::fmt::Write as _;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SunburstError};
use crate::hierarchy::TopicNode;
use crate::reconcile::{reconcile, Reconciliation};

/// One source text as produced by the offline extraction.
///
/// Topic membership comes as `topics` or `found`, each either a list of topic
/// names or a map keyed by topic name. Both are honored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Pre-rendered HTML card.
    #[serde(default, rename = "htmlCard")]
    pub html_card: String,
    #[serde(default, deserialize_with = "topic_names")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "topic_names")]
    pub found: Vec<String>,
}

impl TextRecord {
    /// Whether the text lists `topic` among its topics.
    pub fn mentions(&self, topic: &str) -> bool {
        self.topics.iter().chain(&self.found).any(|t| t == topic)
    }
}

/// Ids arrive as strings in some files and as numbers in others.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "text id must be a string or number, got {other}"
        ))),
    }
}

/// Topic names from a list, or from the keys of a map. `null` is empty.
fn topic_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::Object(map) => Ok(map.into_iter().map(|(name, _)| name).collect()),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(name) => Ok(name),
                other => Err(serde::de::Error::custom(format!(
                    "topic name must be a string, got {other}"
                ))),
            })
            .collect(),
        other => Err(serde::de::Error::custom(format!(
            "topics must be a list or a map, got {other}"
        ))),
    }
}

/// All texts of one corpus, in file order.
#[derive(Debug, Clone, Default)]
pub struct TextCollection {
    records: Vec<TextRecord>,
}

impl TextCollection {
    /// Parse a text file. `resource` names the source in errors.
    pub fn from_json(resource: &str, json: &str) -> Result<Self> {
        let records: Vec<TextRecord> =
            serde_json::from_str(json).map_err(|e| SunburstError::malformed(resource, &e))?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Texts belonging to a topic: listed in its `textIDs`, or naming it as
    /// a topic. File order is kept.
    pub fn matching<'a>(&'a self, topic: &'a TopicNode) -> impl Iterator<Item = &'a TextRecord> {
        self.records
            .iter()
            .filter(move |r| topic.text_ids.contains(&r.id) || r.mentions(&topic.name))
    }

    /// Cards for a topic with its verbatims highlighted.
    pub fn cards_for(&self, topic: &TopicNode) -> Vec<TextCard> {
        let class = topic_class(&topic.name);
        self.matching(topic)
            .map(|record| TextCard {
                id: record.id.clone(),
                html: highlight_verbatims(&record.html_card, &topic.verbatims),
                highlight_class: class.clone(),
            })
            .collect()
    }
}

/// A text card ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextCard {
    pub id: String,
    /// Card HTML with verbatim matches wrapped.
    pub html: String,
    /// CSS class carried by pre-marked topic spans in the card.
    pub highlight_class: String,
}

/// The side panel: detail heading plus the cards of the selected topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextPanel {
    pub title: String,
    pub cards: Vec<TextCard>,
    /// Card ids that entered, stayed or left since the previous panel.
    pub diff: Reconciliation<String>,
}

impl TextPanel {
    /// Build the next panel, diffing card ids against the current one.
    pub fn next(&self, title: String, cards: Vec<TextCard>) -> Self {
        let previous: Vec<String> = self.cards.iter().map(|c| c.id.clone()).collect();
        let diff = reconcile(&previous, &cards, |card| card.id.clone());
        Self { title, cards, diff }
    }

    /// Empty panel; every current card exits.
    pub fn cleared(&self) -> Self {
        self.next(String::new(), Vec::new())
    }
}

/// CSS class naming a topic inside pre-marked cards: `x<topic>x`, with
/// whitespace runs replaced by `_`.
pub fn topic_class(name: &str) -> String {
    let mut class = String::from("x");
    for (i, word) in name.split_whitespace().enumerate() {
        if i > 0 {
            class.push('_');
        }
        class.push_str(word);
    }
    class.push('x');
    class
}

/// Wrap every occurrence of a verbatim phrase in `<span class="verbatim">`.
///
/// Only text outside tags is touched. Where phrases overlap the longer one
/// wins. Matching is case-sensitive.
pub fn highlight_verbatims(html: &str, verbatims: &[String]) -> String {
    let mut phrases: Vec<&str> = verbatims
        .iter()
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    phrases.dedup();
    if phrases.is_empty() {
        return html.to_string();
    }

    let mut out = String::with_capacity(html.len() + 32);
    let mut rest = html;
    while !rest.is_empty() {
        if rest.starts_with('<') {
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            out.push_str(&rest[..end]);
            rest = &rest[end..];
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            mark(&rest[..end], &phrases, &mut out);
            rest = &rest[end..];
        }
    }
    out
}

fn mark(text: &str, phrases: &[&str], out: &mut String) {
    let mut i = 0;
    while i < text.len() {
        let tail = &text[i..];
        if let Some(phrase) = phrases.iter().find(|p| tail.starts_with(**p)) {
            let _ = write!(out, "<span class=\"verbatim\">{phrase}</span>");
            i += phrase.len();
        } else {
            let len = tail.chars().next().map_or(1, char::len_utf8);
            out.push_str(&tail[..len]);
            i += len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(name: &str, ids: &[&str], verbatims: &[&str]) -> TopicNode {
        let mut node = TopicNode::leaf(name, 1.0);
        node.text_ids = ids.iter().map(|s| s.to_string()).collect();
        node.verbatims = verbatims.iter().map(|s| s.to_string()).collect();
        node
    }

    const TEXTS: &str = r#"[
        {"id": "t1", "htmlCard": "<p>Have mercy on me</p>", "topics": ["mercy"]},
        {"id": 2, "htmlCard": "<p>Return to the lord</p>", "found": {"return": 1}},
        {"id": "t3", "htmlCard": "<p>Nothing here</p>"}
    ]"#;

    #[test]
    fn test_parse_texts() {
        let texts = TextCollection::from_json("Data/Texts-Hosea.json", TEXTS).unwrap();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts.records[1].id, "2");
        assert!(texts.records[1].mentions("return"));
        assert!(!texts.records[2].mentions("return"));
    }

    #[test]
    fn test_topics_as_map_and_found_as_list() {
        let json = r#"[
            {"id": "t1", "htmlCard": "<p>mercy</p>", "topics": {"mercy": 1}},
            {"id": "t2", "htmlCard": "<p>return</p>", "found": ["return"], "topics": null}
        ]"#;
        let texts = TextCollection::from_json("Data/Texts-Hosea.json", json).unwrap();
        assert!(texts.records[0].mentions("mercy"));
        assert!(texts.records[1].mentions("return"));
        assert!(!texts.records[1].mentions("mercy"));
        assert_eq!(texts.matching(&topic("mercy", &[], &[])).count(), 1);
    }

    #[test]
    fn test_parse_failure_is_data_fetch() {
        let err = TextCollection::from_json("Data/Texts-Hosea.json", "{\"id\": 1}").unwrap_err();
        assert!(matches!(err, SunburstError::DataFetch { .. }));
    }

    #[test]
    fn test_matching_by_id_or_membership() {
        let texts = TextCollection::from_json("t", TEXTS).unwrap();

        let by_topic = topic("mercy", &[], &[]);
        let ids: Vec<&str> = texts.matching(&by_topic).map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t1"]);

        let by_id = topic("unrelated", &["t3", "2"], &[]);
        let ids: Vec<&str> = texts.matching(&by_id).map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "t3"]);

        let found = topic("return", &[], &[]);
        assert_eq!(texts.matching(&found).count(), 1);
    }

    #[test]
    fn test_highlight_outside_tags_only() {
        let html = r#"<p class="mercy">Have mercy on me</p>"#;
        let marked = highlight_verbatims(html, &["mercy".to_string()]);
        assert_eq!(
            marked,
            r#"<p class="mercy">Have <span class="verbatim">mercy</span> on me</p>"#
        );
    }

    #[test]
    fn test_highlight_prefers_longer_phrase() {
        let html = "<p>Have mercy on me, mercy</p>";
        let marked = highlight_verbatims(html, &["mercy".to_string(), "mercy on me".to_string()]);
        assert_eq!(
            marked,
            "<p>Have <span class=\"verbatim\">mercy on me</span>, <span class=\"verbatim\">mercy</span></p>"
        );
    }

    #[test]
    fn test_highlight_without_phrases_is_identity() {
        let html = "<p>plain</p>";
        assert_eq!(highlight_verbatims(html, &[]), html);
        assert_eq!(highlight_verbatims(html, &["  ".to_string()]), html);
    }

    #[test]
    fn test_topic_class() {
        assert_eq!(topic_class("mercy"), "xmercyx");
        assert_eq!(topic_class("return  to the lord"), "xreturn_to_the_lordx");
    }

    #[test]
    fn test_panel_diff() {
        let texts = TextCollection::from_json("t", TEXTS).unwrap();
        let empty = TextPanel::default();

        let first = empty.next("Topic: 'mercy'".into(), texts.cards_for(&topic("mercy", &["2"], &["mercy"])));
        assert_eq!(first.diff.entered, vec!["t1", "2"]);
        assert!(first.cards[0].html.contains("<span class=\"verbatim\">mercy</span>"));
        assert_eq!(first.cards[0].highlight_class, "xmercyx");

        let second = first.next("Topic: 'return'".into(), texts.cards_for(&topic("return", &[], &[])));
        assert_eq!(second.diff.updated, vec!["2"]);
        assert_eq!(second.diff.exited, vec!["t1"]);

        let cleared = second.cleared();
        assert!(cleared.title.is_empty() && cleared.cards.is_empty());
        assert_eq!(cleared.diff.exited, vec!["2"]);
    }
}
