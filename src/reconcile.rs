//! Keyed enter/update/exit diffing.
//!
//! Given the keys currently displayed and the items of the next render, split
//! the items into those that appear for the first time, those that persist,
//! and the keys that disappear. Chart nodes and text cards both go through
//! this.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Serialize;

/// Result of reconciling one render against the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation<K> {
    /// Keys present now but not before, in the order of the new items.
    pub entered: Vec<K>,
    /// Keys present both before and now, in the order of the new items.
    pub updated: Vec<K>,
    /// Keys present before but not now, in their previous order.
    pub exited: Vec<K>,
}

impl<K> Reconciliation<K> {
    /// Whether nothing entered or exited.
    pub fn is_stable(&self) -> bool {
        self.entered.is_empty() && self.exited.is_empty()
    }
}

impl<K> Default for Reconciliation<K> {
    fn default() -> Self {
        Self {
            entered: Vec::new(),
            updated: Vec::new(),
            exited: Vec::new(),
        }
    }
}

/// Diff `next` against `previous` by key.
///
/// Duplicate keys in `next` are reported once, at their first position.
pub fn reconcile<K, T, F>(previous: &[K], next: &[T], key_of: F) -> Reconciliation<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let before: HashSet<&K> = previous.iter().collect();
    let mut seen: HashSet<K> = HashSet::with_capacity(next.len());
    let mut result = Reconciliation::default();

    for item in next {
        let key = key_of(item);
        if !seen.insert(key.clone()) {
            continue;
        }
        if before.contains(&key) {
            result.updated.push(key);
        } else {
            result.entered.push(key);
        }
    }

    result.exited = previous
        .iter()
        .filter(|k| !seen.contains(*k))
        .cloned()
        .collect();
    result
}
