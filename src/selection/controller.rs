//! Click-driven selection state machine.
//!
//! ```text
//! Unselected   --click n-->  Selected(n)
//! Selected(n)  --click n-->  Unselected
//! Selected(n)  --click m-->  Selected(m)
//! ```
//!
//! Entering `Selected(n)` keeps the root path of `n` active and dims every
//! other node. Any inconsistency while doing so resets to the unselected
//! baseline before the error is returned.

use crate::error::{Result, SunburstError};
use crate::hierarchy::{HierarchyTree, NodeKey};

/// Current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(NodeKey),
}

/// Owns the selection state and applies it to a tree's display flags.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Key of the selected node, if any.
    pub fn selected(&self) -> Option<&NodeKey> {
        match &self.state {
            SelectionState::Selected(key) => Some(key),
            SelectionState::Unselected => None,
        }
    }

    /// Handle a click on `key`. Returns the new selection.
    ///
    /// On error the tree is back at baseline and the state is `Unselected`.
    pub fn click(&mut self, tree: &mut HierarchyTree, key: &NodeKey) -> Result<Option<NodeKey>> {
        if self.selected() == Some(key) {
            self.reset(tree);
            return Ok(None);
        }

        match self.select(tree, key) {
            Ok(()) => {
                self.state = SelectionState::Selected(key.clone());
                Ok(Some(key.clone()))
            }
            Err(err) => {
                self.reset(tree);
                Err(err)
            }
        }
    }

    /// Re-apply the current selection to a tree after re-layout.
    /// A selection the tree no longer contains is dropped.
    pub fn reapply(&mut self, tree: &mut HierarchyTree) -> Result<()> {
        let Some(key) = self.selected().cloned() else {
            self.reset(tree);
            return Ok(());
        };
        if let Err(err) = self.select(tree, &key) {
            self.reset(tree);
            return Err(err);
        }
        Ok(())
    }

    /// Return to the baseline: nothing selected, nothing dimmed.
    pub fn reset(&mut self, tree: &mut HierarchyTree) {
        self.state = SelectionState::Unselected;
        for node in tree.nodes_mut() {
            node.state.clear_emphasis();
        }
    }

    /// Forget the selection without touching any tree (corpus change).
    pub fn clear(&mut self) {
        self.state = SelectionState::Unselected;
    }

    fn select(&self, tree: &mut HierarchyTree, key: &NodeKey) -> Result<()> {
        let index = tree
            .index_of(key)
            .ok_or_else(|| SunburstError::Selection(format!("unknown node '{key}'")))?;
        if tree.node(index).is_some_and(|n| n.state.is_hidden()) {
            return Err(SunburstError::Selection(format!("'{key}' is not displayed")));
        }
        let path = tree
            .path_from_root(index)
            .ok_or_else(|| SunburstError::Selection(format!("no root path for '{key}'")))?;

        for node in tree.nodes_mut() {
            node.state.set_selected(false);
            node.state.set_dimmed(true);
        }
        for &on_path in &path {
            let node = tree
                .node_mut(on_path)
                .ok_or_else(|| SunburstError::Selection(format!("stale path through '{key}'")))?;
            node.state.set_dimmed(false);
        }
        let node = tree
            .node_mut(index)
            .ok_or_else(|| SunburstError::Selection(format!("stale node '{key}'")))?;
        node.state.set_dimmed(false);
        node.state.set_selected(true);
        Ok(())
    }
}
