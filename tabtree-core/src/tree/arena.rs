//! Node storage for the tab tree
//!
//! The forest is kept as an arena: a map from opaque [`TabId`] handles to
//! nodes, plus an ordered list of top-level roots. Parent links are
//! non-owning back-references; each node is owned by the arena itself.
//! This makes "does this handle still name a live tab" an O(1) lookup,
//! which is what the undo replay logic relies on.

use std::collections::HashMap;

use super::types::{TabData, TabId};

/// A single tab node in the forest.
///
/// Nodes are only ever created and mutated through the arena and the
/// model; consumers get shared references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: TabId,
    parent: Option<TabId>,
    children: Vec<TabId>,
    collapsed: bool,
    pinned: bool,
    data: TabData,
}

impl Node {
    /// Creates a detached node with no parent and no children.
    #[must_use]
    pub(crate) fn new(id: TabId, data: TabData) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            collapsed: false,
            pinned: false,
            data,
        }
    }

    /// The handle naming this node.
    #[must_use]
    pub const fn id(&self) -> TabId {
        self.id
    }

    /// The parent handle, or `None` for a top-level tab.
    #[must_use]
    pub const fn parent(&self) -> Option<TabId> {
        self.parent
    }

    /// The ordered child handles.
    #[must_use]
    pub fn children(&self) -> &[TabId] {
        &self.children
    }

    /// Whether the node's descendants are hidden from the visible order.
    ///
    /// The flag is kept even for childless nodes so that session
    /// round-trips preserve it exactly; it only affects visibility once
    /// the node has children.
    #[must_use]
    pub const fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// Whether the tab is pinned.
    #[must_use]
    pub const fn pinned(&self) -> bool {
        self.pinned
    }

    /// The page payload.
    #[must_use]
    pub const fn data(&self) -> &TabData {
        &self.data
    }

    pub(crate) fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub(crate) fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub(crate) fn data_mut(&mut self) -> &mut TabData {
        &mut self.data
    }
}

/// A structural position: a parent (or the root list) plus a sibling index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    /// The parent to attach under, or `None` for the root list.
    pub parent: Option<TabId>,
    /// Index among the parent's children (or among the roots).
    pub index: usize,
}

/// The forest of tab nodes.
///
/// Owns every node and the ordered root list. All structural edits go
/// through [`attach`](Self::attach) / [`detach`](Self::detach) so that the
/// parent/children invariants cannot drift apart.
#[derive(Debug, Default, Clone)]
pub(crate) struct NodeArena {
    nodes: HashMap<TabId, Node>,
    roots: Vec<TabId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: TabId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: TabId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn roots(&self) -> &[TabId] {
        &self.roots
    }

    /// Inserts a detached node and links it in at `slot`.
    ///
    /// The index is clamped to the current sibling-list length, so replay
    /// code can pass recorded positions without re-validating them.
    pub fn insert(&mut self, node: Node, slot: Slot) {
        debug_assert!(!self.nodes.contains_key(&node.id));
        let id = node.id;
        self.nodes.insert(id, node);
        self.link(id, slot);
    }

    /// Detaches a node from its sibling list, returning the slot it held.
    ///
    /// The node stays in the arena with no parent; its own children are
    /// untouched. Callers must re-attach or remove it.
    pub fn detach(&mut self, id: TabId) -> Slot {
        let parent = self.nodes[&id].parent;
        let list = match parent {
            Some(p) => &mut self
                .nodes
                .get_mut(&p)
                .expect("parent of live node must exist")
                .children,
            None => &mut self.roots,
        };
        let index = list
            .iter()
            .position(|&c| c == id)
            .expect("node must appear in its sibling list");
        list.remove(index);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
        Slot { parent, index }
    }

    /// Re-attaches a detached node at `slot`.
    pub fn attach(&mut self, id: TabId, slot: Slot) {
        debug_assert!(self.nodes[&id].parent.is_none());
        debug_assert!(!self.roots.contains(&id));
        self.link(id, slot);
    }

    fn link(&mut self, id: TabId, slot: Slot) {
        let list = match slot.parent {
            Some(p) => &mut self
                .nodes
                .get_mut(&p)
                .expect("attach target must exist")
                .children,
            None => &mut self.roots,
        };
        let index = slot.index.min(list.len());
        list.insert(index, id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = slot.parent;
        }
    }

    /// Removes a node from the arena entirely.
    ///
    /// The node must already be detached and childless (or its children
    /// must be removed in the same pass, as recursive close does).
    pub fn take(&mut self, id: TabId) -> Option<Node> {
        self.nodes.remove(&id)
    }

    /// The slot a node currently occupies.
    pub fn slot_of(&self, id: TabId) -> Option<Slot> {
        let node = self.nodes.get(&id)?;
        let list = match node.parent {
            Some(p) => self.nodes.get(&p)?.children(),
            None => &self.roots,
        };
        let index = list.iter().position(|&c| c == id)?;
        Some(Slot {
            parent: node.parent,
            index,
        })
    }

    /// The sibling list a slot refers to.
    pub fn sibling_list(&self, parent: Option<TabId>) -> &[TabId] {
        match parent {
            Some(p) => self.nodes.get(&p).map_or(&[], Node::children),
            None => &self.roots,
        }
    }

    /// All ids in the subtree rooted at `id`, pre-order, collapse ignored.
    pub fn subtree(&self, id: TabId) -> Vec<TabId> {
        let mut out = Vec::new();
        self.collect_subtree(id, &mut out);
        out
    }

    fn collect_subtree(&self, id: TabId, out: &mut Vec<TabId>) {
        out.push(id);
        if let Some(node) = self.nodes.get(&id) {
            for &child in node.children() {
                self.collect_subtree(child, out);
            }
        }
    }

    /// Returns true if `id` is `ancestor` or sits below it.
    pub fn is_in_subtree(&self, id: TabId, ancestor: TabId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.nodes.get(&c).and_then(Node::parent);
        }
        false
    }

    /// The top-level ancestor of a node (the node itself if it is a root).
    pub fn top_level_ancestor(&self, id: TabId) -> TabId {
        let mut cur = id;
        while let Some(p) = self.nodes.get(&cur).and_then(Node::parent) {
            cur = p;
        }
        cur
    }

    /// Whether any strict ancestor of `id` is collapsed.
    pub fn is_hidden(&self, id: TabId) -> bool {
        let mut cur = self.nodes.get(&id).and_then(Node::parent);
        while let Some(p) = cur {
            let Some(node) = self.nodes.get(&p) else {
                return false;
            };
            if node.collapsed() {
                return true;
            }
            cur = node.parent();
        }
        false
    }

    /// Structural self-check used by tests and diagnostics.
    ///
    /// Verifies that parent links terminate at a root without revisiting a
    /// node, that every node appears in exactly one sibling list, and that
    /// parent back-references match the child lists.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (&id, node) in &self.nodes {
            debug_assert_eq!(id, node.id);
            let mut seen = vec![id];
            let mut cur = node.parent;
            while let Some(p) = cur {
                if seen.contains(&p) {
                    return Err(format!("cycle through {p}"));
                }
                let Some(pn) = self.nodes.get(&p) else {
                    return Err(format!("{id} has dangling parent {p}"));
                };
                seen.push(p);
                cur = pn.parent;
            }
            let list = self.sibling_list(node.parent);
            if list.iter().filter(|&&c| c == id).count() != 1 {
                return Err(format!("{id} not exactly once in its sibling list"));
            }
            for &child in node.children() {
                match self.nodes.get(&child) {
                    Some(c) if c.parent == Some(id) => {}
                    Some(_) => return Err(format!("{child} disagrees about parent {id}")),
                    None => return Err(format!("{id} lists dead child {child}")),
                }
            }
        }
        let reachable: usize = self.roots.iter().map(|&r| self.subtree(r).len()).sum();
        if reachable != self.nodes.len() {
            return Err(format!(
                "{} nodes reachable from roots, {} stored",
                reachable,
                self.nodes.len()
            ));
        }
        Ok(())
    }
}
