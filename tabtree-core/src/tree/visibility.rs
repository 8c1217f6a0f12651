//! Flattened visible ordering of the tab tree
//!
//! The visible order is a pure derivation over the forest: a pre-order
//! walk over the roots that emits every node but skips the descendants of
//! collapsed nodes. Consumers (tab strip, move math, selection) only ever
//! see this derived order, never the raw parent/children lists, so the
//! rendered strip and the structural tree cannot drift apart.

use std::collections::HashMap;

use super::arena::NodeArena;
use super::types::TabId;

/// Branch glyphs for the rendered tree gutter.
const CORNER: &str = "└─";
const INTERSECTION: &str = "├─";
const PIPE: &str = "│ ";
const BLANK: &str = "  ";

/// One visible tab together with its tree-gutter prefix.
///
/// The prefix is the ASCII-art branch decoration a tab strip puts in
/// front of the title (`├─`, `└─`, with `│` continuation for deeper
/// levels). Top-level tabs have an empty prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTab {
    /// The tab at this visible position.
    pub id: TabId,
    /// Branch decoration for the tab's depth and sibling position.
    pub prefix: String,
    /// True if the tab hides a collapsed subtree behind it.
    pub collapsed: bool,
}

/// Cache of the flattened visible order.
///
/// Rebuilt by the model after every structural or collapse-state change;
/// between refreshes all lookups are O(1).
#[derive(Debug, Default, Clone)]
pub(crate) struct VisibilityIndex {
    order: Vec<TabId>,
    index: HashMap<TabId, usize>,
}

impl VisibilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the visible order from the forest.
    pub fn refresh(&mut self, arena: &NodeArena) {
        self.order.clear();
        for &root in arena.roots() {
            self.visit(arena, root);
        }
        self.index = self
            .order
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i))
            .collect();
    }

    fn visit(&mut self, arena: &NodeArena, id: TabId) {
        self.order.push(id);
        let Some(node) = arena.get(id) else { return };
        if node.collapsed() {
            // The node itself stays visible, the subtree is skipped.
            return;
        }
        for &child in node.children() {
            self.visit(arena, child);
        }
    }

    /// The visible tabs, top to bottom.
    pub fn order(&self) -> &[TabId] {
        &self.order
    }

    /// The visible position of a tab, or `None` if it is hidden.
    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// The visible order decorated with tree-gutter prefixes.
    pub fn rendered(&self, arena: &NodeArena) -> Vec<RenderedTab> {
        let mut out = Vec::with_capacity(self.order.len());
        for &root in arena.roots() {
            push_rendered(arena, root, "", "", &mut out);
        }
        out
    }
}

fn push_rendered(
    arena: &NodeArena,
    id: TabId,
    prefix: &str,
    lead: &str,
    out: &mut Vec<RenderedTab>,
) {
    let Some(node) = arena.get(id) else { return };
    out.push(RenderedTab {
        id,
        prefix: prefix.to_owned(),
        collapsed: node.collapsed() && !node.children().is_empty(),
    });
    if node.collapsed() {
        return;
    }
    let count = node.children().len();
    for (i, &child) in node.children().iter().enumerate() {
        let last = i + 1 == count;
        let symbol = if last { CORNER } else { INTERSECTION };
        let child_prefix = format!("{lead}{symbol}");
        let child_lead = format!("{lead}{}", if last { BLANK } else { PIPE });
        push_rendered(arena, child, &child_prefix, &child_lead, out);
    }
}
