//! Active/inactive state for forest nodes.
//!
//! Two inputs drive the state: manual toggles and the ignore-pattern list.
//! A toggle cascades to the whole subtree. A pattern change recomputes the
//! forest from scratch. A node that is ignored, or sits under an ignored
//! ancestor, cannot be toggled back on until the pattern goes away.

use tracing::{debug, info};

use crate::parser::patterns::IgnoreList;
use crate::tree::model::{Forest, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Activated,
    Deactivated,
    /// The node stayed inactive because it or an ancestor is ignored.
    Blocked,
}

#[derive(Debug, Clone, Default)]
pub struct Visibility {
    ignore: IgnoreList,
}

impl Visibility {
    pub fn new(ignore: IgnoreList) -> Self {
        Self { ignore }
    }

    pub fn ignore_list(&self) -> &IgnoreList {
        &self.ignore
    }

    /// Flip `id` and push the new state onto every descendant.
    pub fn toggle(&self, forest: &mut Forest, id: NodeId) -> ToggleOutcome {
        let activate = !forest[id].is_active;
        if activate && self.is_node_or_parent_ignored(forest, id) {
            debug!(node = %id, name = %forest[id].name, "toggle blocked by ignore pattern");
            return ToggleOutcome::Blocked;
        }
        forest.set_subtree_active(id, activate);
        debug!(node = %id, name = %forest[id].name, active = activate, "toggled node");
        if activate {
            ToggleOutcome::Activated
        } else {
            ToggleOutcome::Deactivated
        }
    }

    /// True if `id` or any of its ancestors matches an ignore pattern.
    pub fn is_node_or_parent_ignored(&self, forest: &Forest, id: NodeId) -> bool {
        self.ignore.is_match(&forest[id].name)
            || forest.ancestors(id).any(|a| self.ignore.is_match(&a.name))
    }

    /// Reset every node to active, then deactivate each matching node and its
    /// subtree. Manual toggles are discarded.
    pub fn recompute(&self, forest: &mut Forest) {
        let all: Vec<NodeId> = forest.nodes().iter().map(|n| n.id).collect();
        for id in &all {
            forest[*id].is_active = true;
        }
        // Arena order is pre-order, so parents are visited before children and
        // matches below an already-hidden node are still found.
        let mut hidden = 0;
        for id in all {
            if self.ignore.is_match(&forest[id].name) {
                forest.set_subtree_active(id, false);
                hidden += 1;
            }
        }
        debug!(
            patterns = self.ignore.len(),
            matched = hidden,
            active = forest.active_count(),
            "recomputed visibility"
        );
    }

    /// Replace the whole pattern list and recompute.
    pub fn set_patterns(&mut self, forest: &mut Forest, text: &str) {
        self.ignore = IgnoreList::compile(text);
        self.recompute(forest);
    }

    /// Add one pattern and recompute. Returns false if nothing was added.
    pub fn add_pattern(&mut self, forest: &mut Forest, pattern: &str) -> bool {
        if !self.ignore.push(pattern) {
            return false;
        }
        info!(pattern = pattern.trim(), "added ignore pattern");
        self.recompute(forest);
        true
    }

    /// Drop a pattern and reactivate what it alone was hiding.
    ///
    /// Every node the removed pattern matched is reactivated with its subtree
    /// unless it or an ancestor is still ignored. Inside a reactivated subtree
    /// the remaining patterns are applied again, so nodes they match stay
    /// hidden. Other nodes, including manually toggled ones, are left as is.
    pub fn remove_pattern(&mut self, forest: &mut Forest, pattern: &str) -> bool {
        let removed = IgnoreList::single(pattern);
        if !self.ignore.remove(pattern) {
            return false;
        }
        info!(pattern = pattern.trim(), "removed ignore pattern");

        let matched: Vec<NodeId> = forest
            .nodes()
            .iter()
            .filter(|n| removed.is_match(&n.name))
            .map(|n| n.id)
            .collect();
        for id in matched {
            if self.is_node_or_parent_ignored(forest, id) {
                continue;
            }
            forest.set_subtree_active(id, true);
            for d in forest.descendants(id) {
                if self.ignore.is_match(&forest[d].name) {
                    forest.set_subtree_active(d, false);
                }
            }
        }
        true
    }
}
