//! Closure records and the undo stack
//!
//! Every successful close pushes one self-contained [`ClosureRecord`]
//! describing what was removed and where it was attached. Records refer
//! to other tabs only through plain [`TabId`] handles, which dangle
//! harmlessly once the named tab is gone. Replay (in the model) resolves
//! each handle against the live tree at undo time, so records never need
//! fixing up when the tree changes underneath them.

use super::arena::NodeArena;
use super::types::{TabData, TabId};

/// Closes beyond this depth fall off the bottom of the stack.
const UNDO_STACK_LIMIT: usize = 100;

/// Everything needed to bring one closed tab back.
///
/// A recursive close produces a single record whose `children` nest the
/// whole subtree. A non-recursive close produces a flat record that
/// instead remembers the promoted children by handle in `linked_children`.
#[derive(Debug, Clone)]
pub(crate) struct ClosureRecord {
    /// The handle the tab had when it was closed. Only used for
    /// diagnostics; the restored tab gets a fresh handle.
    pub id: TabId,
    pub data: TabData,
    pub collapsed: bool,
    pub pinned: bool,
    /// The parent at close time. Resolved at replay; if the parent is
    /// gone by then the tab comes back as a top-level root.
    pub parent: Option<TabId>,
    /// Sibling index at close time, clamped at replay.
    pub index: usize,
    /// Children that were promoted out by a non-recursive close, in
    /// their original order. Survivors are re-adopted at replay.
    pub linked_children: Vec<TabId>,
    /// Nested records for a recursive close, in original child order.
    pub children: Vec<ClosureRecord>,
}

impl ClosureRecord {
    /// Captures a record for a whole subtree, pre-mutation.
    ///
    /// Returns `None` if `id` is not a live tab.
    pub fn capture_subtree(arena: &NodeArena, id: TabId) -> Option<Self> {
        let node = arena.get(id)?;
        let slot = arena.slot_of(id)?;
        let children = node
            .children()
            .iter()
            .filter_map(|&child| Self::capture_subtree(arena, child))
            .collect();
        Some(Self {
            id,
            data: node.data().clone(),
            collapsed: node.collapsed(),
            pinned: node.pinned(),
            parent: slot.parent,
            index: slot.index,
            linked_children: Vec::new(),
            children,
        })
    }

    /// Captures a record for a single tab whose children will be
    /// promoted, pre-mutation.
    pub fn capture_single(arena: &NodeArena, id: TabId) -> Option<Self> {
        let node = arena.get(id)?;
        let slot = arena.slot_of(id)?;
        Some(Self {
            id,
            data: node.data().clone(),
            collapsed: node.collapsed(),
            pinned: node.pinned(),
            parent: slot.parent,
            index: slot.index,
            linked_children: node.children().to_vec(),
            children: Vec::new(),
        })
    }

    /// Number of tabs this record restores.
    pub fn restored_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(ClosureRecord::restored_count)
            .sum::<usize>()
    }
}

/// LIFO stack of closure records, newest last.
#[derive(Debug, Default)]
pub(crate) struct UndoStack {
    records: Vec<ClosureRecord>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a record, evicting the oldest past the depth limit.
    pub fn push(&mut self, record: ClosureRecord) {
        self.records.push(record);
        if self.records.len() > UNDO_STACK_LIMIT {
            self.records.remove(0);
        }
    }

    /// Pops the most recent record.
    pub fn pop(&mut self) -> Option<ClosureRecord> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops all records. Used when a session snapshot is restored.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
