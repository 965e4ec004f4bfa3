//! Generation tokens for in-flight fetches.
//!
//! Every corpus change bumps the generation. A response is applied only if it
//! carries the latest generation, so a slow response for a corpus the user
//! already left can never overwrite the newer one.

use serde::Serialize;

/// Token identifying one corpus request round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Generation(pub u32);

/// Issues generations and recognizes stale responses.
#[derive(Debug, Default)]
pub struct RequestTracker {
    current: Generation,
    corpus: Option<String>,
}

impl RequestTracker {
    /// A tracker that has issued nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request round for `corpus`.
    pub fn begin(&mut self, corpus: &str) -> Generation {
        self.current = Generation(self.current.0.wrapping_add(1));
        self.corpus = Some(corpus.to_string());
        self.current
    }

    /// The latest generation issued.
    pub fn current(&self) -> Generation {
        self.current
    }

    /// Corpus of the latest round.
    pub fn corpus(&self) -> Option<&str> {
        self.corpus.as_deref()
    }

    /// Whether a response tagged `generation` should be applied.
    pub fn accepts(&self, generation: Generation) -> bool {
        let current = generation == self.current && self.corpus.is_some();
        if !current {
            log::debug!(
                "discarding stale response (generation {}, latest {})",
                generation.0,
                self.current.0
            );
        }
        current
    }
}
