//! The tab tree model
//!
//! [`TreeModel`] owns the forest and every piece of policy state around
//! it: insertion placement, visible ordering, focus selection and the
//! undo stack. All mutations validate their inputs before touching the
//! tree, so an `Err` always leaves the model exactly as it was.

use crate::config::TreeSettings;
use crate::session::{SessionSnapshot, TabSnapshot};

use super::arena::{Node, NodeArena, Slot};
use super::error::{CloseOutcome, TreeError};
use super::position::PositionPolicy;
use super::selection::{self, CloseContext, SelectionPolicy};
use super::types::{MoveTarget, OpenRelation, SelectOverride, TabData, TabId};
use super::undo::{ClosureRecord, UndoStack};
use super::visibility::{RenderedTab, VisibilityIndex};

/// Tree-structured tab hierarchy with placement, focus and undo policy.
#[derive(Debug)]
pub struct TreeModel {
    arena: NodeArena,
    vis: VisibilityIndex,
    position: PositionPolicy,
    selection: SelectionPolicy,
    undo: UndoStack,
    settings: TreeSettings,
    focused: Option<TabId>,
}

impl Default for TreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeModel {
    /// Creates an empty model with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(TreeSettings::default())
    }

    /// Creates an empty model with the given settings.
    #[must_use]
    pub fn with_settings(settings: TreeSettings) -> Self {
        Self {
            arena: NodeArena::new(),
            vis: VisibilityIndex::new(),
            position: PositionPolicy::new(),
            selection: SelectionPolicy::new(),
            undo: UndoStack::new(),
            settings,
            focused: None,
        }
    }

    // ==== Accessors ====

    /// The active settings.
    pub const fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// Replaces the settings. Takes effect for subsequent operations.
    pub fn set_settings(&mut self, settings: TreeSettings) {
        self.settings = settings;
    }

    /// Number of tabs, visible or not.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True if the model holds no tabs.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// True if the handle names a live tab.
    pub fn contains(&self, id: TabId) -> bool {
        self.arena.contains(id)
    }

    /// The node for a live tab.
    pub fn get(&self, id: TabId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// The focused tab, if any tab exists.
    pub const fn focused(&self) -> Option<TabId> {
        self.focused
    }

    /// The top-level tabs in order.
    pub fn roots(&self) -> &[TabId] {
        self.arena.roots()
    }

    /// The visible tabs, top to bottom.
    pub fn visible_order(&self) -> &[TabId] {
        self.vis.order()
    }

    /// The visible position of a tab, or `None` if it is hidden.
    pub fn visible_index(&self, id: TabId) -> Option<usize> {
        self.vis.index_of(id)
    }

    /// The visible tabs decorated with tree-gutter prefixes.
    pub fn rendered(&self) -> Vec<RenderedTab> {
        self.vis.rendered(&self.arena)
    }

    /// Number of closes that can currently be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    // ==== Open ====

    /// Opens a new tab relative to the focused tab.
    ///
    /// A background open keeps the current focus and becomes the
    /// stacking anchor for the next background open. A foreground open
    /// focuses the new tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the placement cannot be resolved.
    pub fn open(
        &mut self,
        data: TabData,
        relation: OpenRelation,
        background: bool,
    ) -> Result<TabId, TreeError> {
        self.open_from(data, relation, self.focused, background)
    }

    /// Opens a new tab relative to an explicit reference tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is dead or the placement cannot
    /// be resolved.
    pub fn open_from(
        &mut self,
        data: TabData,
        relation: OpenRelation,
        reference: Option<TabId>,
        background: bool,
    ) -> Result<TabId, TreeError> {
        let slot = self
            .position
            .resolve(&self.arena, &self.settings, relation, reference)?;
        let id = TabId::new();
        self.arena.insert(Node::new(id, data), slot);
        self.vis.refresh(&self.arena);
        if background {
            self.position.set_anchor(id);
        } else {
            self.focus(id)?;
        }
        tracing::debug!(tab = %id, relation = %relation, background, "opened tab");
        Ok(id)
    }

    // ==== Focus ====

    /// Focuses a tab, expanding any collapsed ancestors hiding it.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::TabNotFound`] for a dead handle.
    pub fn focus(&mut self, id: TabId) -> Result<(), TreeError> {
        if !self.arena.contains(id) {
            return Err(TreeError::TabNotFound(id));
        }
        if self.arena.is_hidden(id) {
            self.reveal(id);
            self.vis.refresh(&self.arena);
        }
        self.focused = Some(id);
        self.selection.record_focus(id);
        self.position.reset_anchor();
        Ok(())
    }

    /// Expands every collapsed strict ancestor of `id`.
    fn reveal(&mut self, id: TabId) {
        let mut cur = self.arena.get(id).and_then(Node::parent);
        while let Some(p) = cur {
            let Some(node) = self.arena.get_mut(p) else {
                break;
            };
            if node.collapsed() {
                node.set_collapsed(false);
            }
            cur = node.parent();
        }
    }

    // ==== Close ====

    /// Closes a tab with the configured post-close selection.
    ///
    /// See [`close_with`](Self::close_with).
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn close(
        &mut self,
        id: TabId,
        recursive: bool,
        force: bool,
    ) -> Result<CloseOutcome, TreeError> {
        self.close_with(id, recursive, force, None)
    }

    /// Closes a tab, optionally with its whole subtree.
    ///
    /// Closing a collapsed group head always takes its subtree along,
    /// even with `recursive = false`. A non-recursive close promotes the
    /// first child into the closed tab's slot and appends the remaining
    /// children to the promoted tab.
    ///
    /// Without `force`, pinned tabs in scope veto the close: nothing is
    /// mutated and the pinned handles come back in
    /// [`CloseOutcome::ConfirmationRequired`].
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle, or for a `select` override
    /// that is invalid under the configured selection policy.
    pub fn close_with(
        &mut self,
        id: TabId,
        recursive: bool,
        force: bool,
        select: Option<SelectOverride>,
    ) -> Result<CloseOutcome, TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::TabNotFound(id))?;
        let effective_recursive = recursive || (node.collapsed() && !node.children().is_empty());
        // Resolve the selection directive up front so an invalid
        // override fails before anything is removed.
        let directive = selection::resolve_directive(self.settings.select_on_remove, select)?;
        if !force {
            let pinned = self.pinned_scope(id, effective_recursive);
            if !pinned.is_empty() {
                tracing::debug!(tab = %id, count = pinned.len(), "close blocked by pinned tabs");
                return Ok(CloseOutcome::ConfirmationRequired { pinned });
            }
        }

        let ctx = CloseContext::capture(&self.arena, self.vis.order(), id);
        let removed = if effective_recursive {
            self.arena.subtree(id)
        } else {
            vec![id]
        };
        let record = if effective_recursive {
            ClosureRecord::capture_subtree(&self.arena, id)
        } else {
            ClosureRecord::capture_single(&self.arena, id)
        }
        .ok_or(TreeError::TabNotFound(id))?;

        if effective_recursive {
            self.arena.detach(id);
            for &tab in &removed {
                self.arena.take(tab);
            }
        } else {
            let slot = self.arena.detach(id);
            let children = self
                .arena
                .get(id)
                .map_or_else(Vec::new, |n| n.children().to_vec());
            if let Some((&promoted, rest)) = children.split_first() {
                self.arena.detach(promoted);
                self.arena.attach(promoted, slot);
                // Remaining children go after the promoted tab's own
                // children, keeping their relative order.
                for &child in rest {
                    self.arena.detach(child);
                    let index = self.arena.get(promoted).map_or(0, |n| n.children().len());
                    self.arena.attach(
                        child,
                        Slot {
                            parent: Some(promoted),
                            index,
                        },
                    );
                }
            }
            self.arena.take(id);
        }

        self.vis.refresh(&self.arena);
        self.position.prune(&self.arena);
        self.selection.prune(&self.arena);

        // A surviving focused tab can end up under a collapsed promoted
        // sibling; keep it visible.
        if let Some(focused) = self.focused
            && !removed.contains(&focused)
            && self.arena.is_hidden(focused)
        {
            self.reveal(focused);
            self.vis.refresh(&self.arena);
        }

        if self.focused.is_some_and(|f| removed.contains(&f)) {
            self.focused = None;
            if let Some(next) = self.selection.pick(&self.arena, directive, &ctx) {
                self.focused = Some(next);
                self.selection.record_focus(next);
                self.position.reset_anchor();
            }
        }

        self.undo.push(record);
        tracing::debug!(
            tab = %id,
            recursive = effective_recursive,
            removed = removed.len(),
            "closed tab"
        );
        Ok(CloseOutcome::Closed {
            focus: self.focused,
        })
    }

    /// The pinned tabs a close of `id` would remove.
    ///
    /// `recursive` is widened the same way `close_with` widens it for a
    /// collapsed group head.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn pinned_in_scope(&self, id: TabId, recursive: bool) -> Result<Vec<TabId>, TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::TabNotFound(id))?;
        let effective = recursive || (node.collapsed() && !node.children().is_empty());
        Ok(self.pinned_scope(id, effective))
    }

    fn pinned_scope(&self, id: TabId, recursive: bool) -> Vec<TabId> {
        let scope = if recursive {
            self.arena.subtree(id)
        } else {
            vec![id]
        };
        scope
            .into_iter()
            .filter(|&t| self.arena.get(t).is_some_and(Node::pinned))
            .collect()
    }

    // ==== Undo ====

    /// Undoes the most recent close.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NothingToUndo`] if no close is recorded.
    pub fn undo_close(&mut self) -> Result<TabId, TreeError> {
        self.undo(1).map(|restored| restored[0])
    }

    /// Undoes up to `count` closes, most recent first.
    ///
    /// Each record restores its tabs under fresh handles. The recorded
    /// parent is resolved against the live tree at replay time; if it is
    /// gone the tab comes back as a top-level root. Children that were
    /// promoted out by a non-recursive close are re-adopted if they
    /// still exist. The last restored tab takes focus.
    ///
    /// Returns the restored tabs, one handle per undone close.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NothingToUndo`] only when the stack is
    /// empty; a `count` past the stack depth undoes what is there.
    pub fn undo(&mut self, count: usize) -> Result<Vec<TabId>, TreeError> {
        if self.undo.is_empty() {
            return Err(TreeError::NothingToUndo);
        }
        let n = count.clamp(1, self.undo.len());
        let mut restored = Vec::with_capacity(n);
        for _ in 0..n {
            let Some(record) = self.undo.pop() else {
                break;
            };
            let new_id = self.replay(&record, None);
            tracing::debug!(
                was = %record.id,
                now = %new_id,
                tabs = record.restored_count(),
                "restored closed tab"
            );
            restored.push(new_id);
        }
        self.vis.refresh(&self.arena);
        if let Some(&last) = restored.last() {
            self.focus(last)?;
        }
        Ok(restored)
    }

    /// Rebuilds one record's tabs. Returns the new handle of its root.
    fn replay(&mut self, record: &ClosureRecord, parent_override: Option<(TabId, usize)>) -> TabId {
        let new_id = TabId::new();
        let (parent, index) = match parent_override {
            Some((p, i)) => (Some(p), i),
            None => (
                record.parent.filter(|&p| self.arena.contains(p)),
                record.index,
            ),
        };
        let mut node = Node::new(new_id, record.data.clone());
        node.set_collapsed(record.collapsed);
        node.set_pinned(record.pinned);
        self.arena.insert(node, Slot { parent, index });
        for (i, child) in record.children.iter().enumerate() {
            self.replay(child, Some((new_id, i)));
        }
        for &child in &record.linked_children {
            if !self.arena.contains(child) {
                continue;
            }
            // A survivor that has since become an ancestor of the
            // restore point cannot be re-adopted.
            if self.arena.is_in_subtree(new_id, child) {
                continue;
            }
            self.arena.detach(child);
            let index = self.arena.get(new_id).map_or(0, |n| n.children().len());
            self.arena.attach(
                child,
                Slot {
                    parent: Some(new_id),
                    index,
                },
            );
        }
        new_id
    }

    // ==== Move ====

    /// Moves a tab (with its subtree) to a new position.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle, a hidden tab, a target
    /// outside the visible order, or a move that would change nothing.
    pub fn move_tab(&mut self, id: TabId, target: MoveTarget) -> Result<(), TreeError> {
        if !self.arena.contains(id) {
            return Err(TreeError::TabNotFound(id));
        }
        match target {
            MoveTarget::Promote => self.promote(id),
            MoveTarget::Demote => self.demote(id),
            MoveTarget::Absolute(index) => self.move_to_visible(id, index as isize),
            MoveTarget::Relative(delta) => {
                let cur = self.vis.index_of(id).ok_or(TreeError::TabNotVisible(id))?;
                self.move_to_visible(id, cur as isize + delta)
            }
        }
    }

    /// Makes a tab the next sibling of its former parent.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::CannotPromoteRoot`] for a top-level tab.
    pub fn promote(&mut self, id: TabId) -> Result<(), TreeError> {
        let node = self.arena.get(id).ok_or(TreeError::TabNotFound(id))?;
        let parent = node.parent().ok_or(TreeError::CannotPromoteRoot(id))?;
        let parent_slot = self
            .arena
            .slot_of(parent)
            .ok_or(TreeError::TabNotFound(parent))?;
        self.arena.detach(id);
        self.arena.attach(
            id,
            Slot {
                parent: parent_slot.parent,
                index: parent_slot.index + 1,
            },
        );
        self.vis.refresh(&self.arena);
        tracing::debug!(tab = %id, "promoted tab");
        Ok(())
    }

    /// Makes a tab the last child of its preceding sibling.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NoPrecedingSibling`] for the first tab in
    /// its sibling list.
    pub fn demote(&mut self, id: TabId) -> Result<(), TreeError> {
        let slot = self.arena.slot_of(id).ok_or(TreeError::TabNotFound(id))?;
        if slot.index == 0 {
            return Err(TreeError::NoPrecedingSibling(id));
        }
        let prev = self.arena.sibling_list(slot.parent)[slot.index - 1];
        self.arena.detach(id);
        let index = self.arena.get(prev).map_or(0, |n| n.children().len());
        self.arena.attach(
            id,
            Slot {
                parent: Some(prev),
                index,
            },
        );
        // Demoting under a collapsed sibling must not hide the focused tab.
        if let Some(focused) = self.focused
            && self.arena.is_in_subtree(focused, id)
            && self.arena.is_hidden(id)
        {
            self.reveal(id);
        }
        self.vis.refresh(&self.arena);
        tracing::debug!(tab = %id, "demoted tab");
        Ok(())
    }

    /// Moves a tab so it lands at visible index `dest`.
    ///
    /// The landing parent is recomputed from the final position: moving
    /// down past a tab with visible children enters that group, moving
    /// past a childless or collapsed tab stays beside it.
    fn move_to_visible(&mut self, id: TabId, dest: isize) -> Result<(), TreeError> {
        let cur = self.vis.index_of(id).ok_or(TreeError::TabNotVisible(id))? as isize;
        if dest == cur {
            return Err(TreeError::MoveWouldNotChange(id));
        }
        let subtree = self.arena.subtree(id);
        let rest: Vec<TabId> = self
            .vis
            .order()
            .iter()
            .copied()
            .filter(|t| !subtree.contains(t))
            .collect();
        if dest < 0 || dest as usize > rest.len() {
            return Err(TreeError::MoveOutOfRange {
                index: dest,
                len: self.vis.len(),
            });
        }
        let dest = dest as usize;
        enum Landing {
            FirstRoot,
            FirstChildOf(TabId),
            After(TabId),
            Before(TabId),
        }
        let landing = if dest == 0 {
            Landing::FirstRoot
        } else if (dest as isize) > cur {
            let anchor = rest[dest - 1];
            let enters_group = self
                .arena
                .get(anchor)
                .is_some_and(|n| !n.collapsed() && !n.children().is_empty());
            if enters_group {
                Landing::FirstChildOf(anchor)
            } else {
                Landing::After(anchor)
            }
        } else {
            Landing::Before(rest[dest])
        };
        self.arena.detach(id);
        let slot = match landing {
            Landing::FirstRoot => Slot {
                parent: None,
                index: 0,
            },
            Landing::FirstChildOf(anchor) => Slot {
                parent: Some(anchor),
                index: 0,
            },
            Landing::After(anchor) => {
                let s = self
                    .arena
                    .slot_of(anchor)
                    .ok_or(TreeError::TabNotFound(anchor))?;
                Slot {
                    parent: s.parent,
                    index: s.index + 1,
                }
            }
            Landing::Before(anchor) => {
                let s = self
                    .arena
                    .slot_of(anchor)
                    .ok_or(TreeError::TabNotFound(anchor))?;
                Slot {
                    parent: s.parent,
                    index: s.index,
                }
            }
        };
        self.arena.attach(id, slot);
        self.vis.refresh(&self.arena);
        tracing::debug!(tab = %id, dest, "moved tab");
        Ok(())
    }

    // ==== Collapse ====

    /// Sets the collapsed flag on a tab.
    ///
    /// Collapsing a group that hides the focused tab moves focus to the
    /// group head. The flag is kept on childless tabs too, so collapse
    /// state survives close/undo and session round-trips.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn set_collapsed(&mut self, id: TabId, collapsed: bool) -> Result<(), TreeError> {
        let node = self.arena.get_mut(id).ok_or(TreeError::TabNotFound(id))?;
        node.set_collapsed(collapsed);
        self.vis.refresh(&self.arena);
        if collapsed
            && self
                .focused
                .is_some_and(|f| f != id && self.arena.is_in_subtree(f, id))
        {
            self.focused = Some(id);
            self.selection.record_focus(id);
            self.position.reset_anchor();
        }
        Ok(())
    }

    /// Toggles the collapsed flag on a tab.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn toggle_collapse(&mut self, id: TabId) -> Result<(), TreeError> {
        let collapsed = self
            .arena
            .get(id)
            .ok_or(TreeError::TabNotFound(id))?
            .collapsed();
        self.set_collapsed(id, !collapsed)
    }

    /// Collapses successively wider groups around a tab.
    ///
    /// Each call collapses the nearest expanded group on the path from
    /// the tab to its root. Once the whole path is collapsed, the next
    /// call expands it all again.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn cycle_collapse(&mut self, id: TabId) -> Result<(), TreeError> {
        if !self.arena.contains(id) {
            return Err(TreeError::TabNotFound(id));
        }
        let mut chain = vec![id];
        let mut cur = self.arena.get(id).and_then(Node::parent);
        while let Some(p) = cur {
            chain.push(p);
            cur = self.arena.get(p).and_then(Node::parent);
        }
        let next = chain.iter().copied().find(|&t| {
            self.arena
                .get(t)
                .is_some_and(|n| !n.children().is_empty() && !n.collapsed())
        });
        if let Some(target) = next {
            self.set_collapsed(target, true)
        } else {
            for &t in &chain {
                if let Some(node) = self.arena.get_mut(t) {
                    node.set_collapsed(false);
                }
            }
            self.vis.refresh(&self.arena);
            Ok(())
        }
    }

    // ==== Tab State ====

    /// Pins or unpins a tab.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn set_pinned(&mut self, id: TabId, pinned: bool) -> Result<(), TreeError> {
        self.arena
            .get_mut(id)
            .ok_or(TreeError::TabNotFound(id))?
            .set_pinned(pinned);
        Ok(())
    }

    /// Updates the URL of a tab.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn set_url(&mut self, id: TabId, url: impl Into<String>) -> Result<(), TreeError> {
        self.arena
            .get_mut(id)
            .ok_or(TreeError::TabNotFound(id))?
            .data_mut()
            .url = url.into();
        Ok(())
    }

    /// Updates the title of a tab.
    ///
    /// # Errors
    ///
    /// Returns an error for a dead handle.
    pub fn set_title(&mut self, id: TabId, title: impl Into<String>) -> Result<(), TreeError> {
        self.arena
            .get_mut(id)
            .ok_or(TreeError::TabNotFound(id))?
            .data_mut()
            .title = title.into();
        Ok(())
    }

    // ==== Session ====

    /// Captures the forest as a handle-free snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let tabs = self
            .arena
            .roots()
            .iter()
            .map(|&root| self.snapshot_node(root))
            .collect();
        SessionSnapshot::new(tabs)
    }

    fn snapshot_node(&self, id: TabId) -> TabSnapshot {
        let Some(node) = self.arena.get(id) else {
            return TabSnapshot::default();
        };
        TabSnapshot {
            url: node.data().url.clone(),
            title: node.data().title.clone(),
            collapsed: node.collapsed(),
            pinned: node.pinned(),
            children: node
                .children()
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }

    /// Replaces the whole model state with a snapshot's content.
    ///
    /// Every tab gets a fresh handle. The undo stack, focus history and
    /// stacking anchor are cleared; the first visible tab takes focus.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.arena = NodeArena::new();
        self.undo.clear();
        self.selection.clear();
        self.position.reset_anchor();
        self.focused = None;
        for tab in &snapshot.tabs {
            self.restore_node(tab, None);
        }
        self.vis.refresh(&self.arena);
        if let Some(&first) = self.vis.order().first() {
            self.focused = Some(first);
            self.selection.record_focus(first);
        }
        tracing::debug!(tabs = self.arena.len(), "restored session snapshot");
    }

    fn restore_node(&mut self, snap: &TabSnapshot, parent: Option<TabId>) {
        let id = TabId::new();
        let index = self.arena.sibling_list(parent).len();
        let mut node = Node::new(id, TabData::new(snap.url.clone(), snap.title.clone()));
        node.set_collapsed(snap.collapsed);
        node.set_pinned(snap.pinned);
        self.arena.insert(node, Slot { parent, index });
        for child in &snap.children {
            self.restore_node(child, Some(id));
        }
    }

    // ==== Diagnostics ====

    /// Structural self-check used by tests and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        self.arena.check_invariants()?;
        let mut fresh = VisibilityIndex::new();
        fresh.refresh(&self.arena);
        if fresh.order() != self.vis.order() {
            return Err("visible order is out of date".into());
        }
        if let Some(focused) = self.focused
            && !self.arena.contains(focused)
        {
            return Err(format!("focused tab {focused} is dead"));
        }
        Ok(())
    }
}
