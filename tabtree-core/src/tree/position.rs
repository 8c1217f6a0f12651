//! Insertion point resolution for newly opened tabs
//!
//! Placement is resolved from the open relation and the per-axis policy
//! settings before any mutation happens. The policy also tracks a
//! stacking anchor so that several background opens in a row line up
//! after one another instead of all landing in the same slot.

use crate::config::{NewChildPosition, NewTabPosition, TreeSettings};

use super::arena::{NodeArena, Slot};
use super::error::TreeError;
use super::types::{OpenRelation, TabId};

/// Resolves where a new tab is inserted.
///
/// The anchor is the most recent background-opened tab. It shifts the
/// pivot for `Next`/`Prev` placements so consecutive background opens
/// stack in open order. Focusing any tab or opening in the foreground
/// resets it.
#[derive(Debug, Default, Clone)]
pub(crate) struct PositionPolicy {
    anchor: Option<TabId>,
}

impl PositionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers a background-opened tab as the stacking pivot.
    pub fn set_anchor(&mut self, id: TabId) {
        self.anchor = Some(id);
    }

    /// Forgets the stacking pivot. Called on every focus change.
    pub fn reset_anchor(&mut self) {
        self.anchor = None;
    }

    /// Drops the anchor if its tab no longer exists.
    pub fn prune(&mut self, arena: &NodeArena) {
        if let Some(anchor) = self.anchor
            && !arena.contains(anchor)
        {
            self.anchor = None;
        }
    }

    /// Resolves the slot for a new tab.
    ///
    /// `reference` is the tab the open is relative to, normally the
    /// focused tab. With no reference the tab goes to the end of the
    /// top level regardless of relation.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::TabNotFound`] if the reference is dead and
    /// [`TreeError::RelatedFirstUnsupported`] for a related open under
    /// the `first` child-position policy.
    pub fn resolve(
        &self,
        arena: &NodeArena,
        settings: &TreeSettings,
        relation: OpenRelation,
        reference: Option<TabId>,
    ) -> Result<Slot, TreeError> {
        if let Some(reference) = reference
            && !arena.contains(reference)
        {
            return Err(TreeError::TabNotFound(reference));
        }
        let Some(reference) = reference else {
            return Ok(Slot {
                parent: None,
                index: arena.roots().len(),
            });
        };
        match relation {
            OpenRelation::Related => self.resolve_child(arena, settings, reference),
            OpenRelation::Sibling => Ok(self.resolve_sibling(arena, settings, reference)),
            OpenRelation::Unrelated => Ok(self.resolve_toplevel(arena, settings, reference)),
        }
    }

    fn resolve_child(
        &self,
        arena: &NodeArena,
        settings: &TreeSettings,
        reference: TabId,
    ) -> Result<Slot, TreeError> {
        match settings.new_child_position {
            NewChildPosition::First => Err(TreeError::RelatedFirstUnsupported),
            NewChildPosition::Last => Ok(Slot {
                parent: Some(reference),
                index: arena.get(reference).map_or(0, |n| n.children().len()),
            }),
        }
    }

    fn resolve_sibling(
        &self,
        arena: &NodeArena,
        settings: &TreeSettings,
        reference: TabId,
    ) -> Slot {
        let parent = arena.get(reference).and_then(super::arena::Node::parent);
        // The anchor only pivots a sibling insert when it sits in the
        // same sibling list as the reference.
        let pivot = self
            .anchor
            .filter(|&a| arena.get(a).is_some_and(|n| n.parent() == parent))
            .unwrap_or(reference);
        let list = arena.sibling_list(parent);
        let index = place_in_list(settings.new_sibling_position, list, pivot);
        Slot { parent, index }
    }

    fn resolve_toplevel(
        &self,
        arena: &NodeArena,
        settings: &TreeSettings,
        reference: TabId,
    ) -> Slot {
        let pivot = self.anchor.unwrap_or(reference);
        let top = arena.top_level_ancestor(pivot);
        let index = place_in_list(settings.new_toplevel_position, arena.roots(), top);
        Slot {
            parent: None,
            index,
        }
    }
}

/// Maps a position policy to a concrete index in a sibling list.
///
/// A pivot missing from the list degrades to appending, which keeps the
/// resolver total without panicking on a stale pivot.
fn place_in_list(position: NewTabPosition, list: &[TabId], pivot: TabId) -> usize {
    let at = list.iter().position(|&t| t == pivot);
    match position {
        NewTabPosition::First => 0,
        NewTabPosition::Last => list.len(),
        NewTabPosition::Next => at.map_or(list.len(), |i| i + 1),
        NewTabPosition::Prev => at.unwrap_or(list.len()),
    }
}
