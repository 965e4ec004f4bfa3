//! Corpus data gateway.
//!
//! The host fetches topic and text files; this module tracks which responses
//! are still wanted and extracts the corpus header shown above the chart.

mod generation;

pub use generation::{Generation, RequestTracker};

use serde::Serialize;

use crate::hierarchy::TopicDocument;

/// Corpus-level metadata from the topic document root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusHeader {
    pub name: String,
    pub run_date: Option<String>,
    pub data_date: Option<String>,
    pub text_count: Option<u64>,
}

impl CorpusHeader {
    /// Read the header fields off a topic document.
    pub fn from_document(doc: &TopicDocument) -> Self {
        Self {
            name: doc.root.name.clone(),
            run_date: doc.run_date.clone(),
            data_date: doc.data_date.clone(),
            text_count: doc.text_count,
        }
    }

    /// "As of" label: the run date with its leading year removed
    /// (`2017-05-02` becomes `As of 05-02`).
    pub fn as_of(&self) -> Option<String> {
        let date = self.run_date.as_deref()?.trim();
        if date.is_empty() {
            return None;
        }
        let trimmed = match date.split_once('-') {
            Some((year, rest)) if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) => {
                rest
            }
            _ => date,
        };
        Some(format!("As of {trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_from_document() {
        let json = r#"{
            "name": "Luke",
            "run_date": "2017-05-02",
            "data_date": "2017-04-30",
            "text_count": 1151,
            "children": [{"name": "prayer", "size": 3}]
        }"#;
        let doc = TopicDocument::from_json("Data/Topics-Luke.json", json).unwrap();
        let header = CorpusHeader::from_document(&doc);
        assert_eq!(header.name, "Luke");
        assert_eq!(header.text_count, Some(1151));
        assert_eq!(header.as_of().as_deref(), Some("As of 05-02"));
    }

    #[test]
    fn test_as_of_without_year() {
        let header = CorpusHeader {
            run_date: Some("May 2".into()),
            ..Default::default()
        };
        assert_eq!(header.as_of().as_deref(), Some("As of May 2"));
        assert_eq!(CorpusHeader::default().as_of(), None);
    }
}
