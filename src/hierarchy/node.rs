//! Node identity and per-node display flags.
//!
//! Every node has:
//! - A stable key assigned at ingestion (survives re-layouts and reloads)
//! - Display flags for selection emphasis and zero-width hiding

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier.
///
/// The `/`-joined path of names from the root. A name repeated among
/// siblings gets an occurrence suffix (`name~1`, `name~2`, ...) so keys are
/// unique within a tree. The root's key is its own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub String);

impl NodeKey {
    /// Key for the root node.
    pub fn root(name: &str) -> Self {
        Self(escape(name))
    }

    /// Key for the `occurrence`-th child named `name` under `self`.
    pub fn child(&self, name: &str, occurrence: usize) -> Self {
        if occurrence == 0 {
            Self(format!("{}/{}", self.0, escape(name)))
        } else {
            Self(format!("{}/{}~{}", self.0, escape(name), occurrence))
        }
    }

    /// Get the raw string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Names may legally contain `/`; keep the separator unambiguous.
fn escape(name: &str) -> String {
    name.replace('%', "%25").replace('/', "%2F").replace('~', "%7E")
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Node display flags packed into a single byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const HIDDEN: u8 = 0b0000_0001;
    const SELECTED: u8 = 0b0000_0010;
    const DIMMED: u8 = 0b0000_0100;

    /// Create a new default node state (visible, not selected, full opacity).
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// Check if the node is hidden (root, or zero-width arc).
    #[inline]
    pub fn is_hidden(self) -> bool {
        self.flags & Self::HIDDEN != 0
    }

    /// Set the hidden state.
    #[inline]
    pub fn set_hidden(&mut self, hidden: bool) {
        self.set(Self::HIDDEN, hidden);
    }

    /// Check if the node is the current selection.
    #[inline]
    pub fn is_selected(self) -> bool {
        self.flags & Self::SELECTED != 0
    }

    /// Set the selected state.
    #[inline]
    pub fn set_selected(&mut self, selected: bool) {
        self.set(Self::SELECTED, selected);
    }

    /// Check if the node is dimmed (off the selected path).
    #[inline]
    pub fn is_dimmed(self) -> bool {
        self.flags & Self::DIMMED != 0
    }

    /// Set the dimmed state.
    #[inline]
    pub fn set_dimmed(&mut self, dimmed: bool) {
        self.set(Self::DIMMED, dimmed);
    }

    /// Clear selection emphasis, keeping visibility.
    #[inline]
    pub fn clear_emphasis(&mut self) {
        self.flags &= !(Self::SELECTED | Self::DIMMED);
    }

    #[inline]
    fn set(&mut self, bit: u8, on: bool) {
        if on {
            self.flags |= bit;
        } else {
            self.flags &= !bit;
        }
    }
}
