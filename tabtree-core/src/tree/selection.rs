//! Post-close focus selection
//!
//! When the focused tab is closed something else must take focus. The
//! configured [`SelectOnRemove`] policy decides which tab, with an
//! optional per-call override. Overrides are resolved against the policy
//! before the close mutates anything, so an invalid combination fails
//! with the tree untouched.

use crate::config::SelectOnRemove;

use super::arena::NodeArena;
use super::error::TreeError;
use super::types::{SelectOverride, TabId};

/// Folds a per-call override into the configured policy.
///
/// # Errors
///
/// Returns [`TreeError::NoOppositeForLastUsed`] for `Opposite` under a
/// `last-used` policy, which has no direction to flip.
pub(crate) fn resolve_directive(
    configured: SelectOnRemove,
    request: Option<SelectOverride>,
) -> Result<SelectOnRemove, TreeError> {
    match request {
        None => Ok(configured),
        Some(SelectOverride::Next) => Ok(SelectOnRemove::Next),
        Some(SelectOverride::Prev) => Ok(SelectOnRemove::Prev),
        Some(SelectOverride::Opposite) => match configured {
            SelectOnRemove::Next => Ok(SelectOnRemove::Prev),
            SelectOnRemove::Prev => Ok(SelectOnRemove::Next),
            // Tree walks toward the next sibling, so its opposite is prev.
            SelectOnRemove::Tree => Ok(SelectOnRemove::Prev),
            SelectOnRemove::LastUsed => Err(TreeError::NoOppositeForLastUsed),
        },
    }
}

/// Context captured before a close, for picking the replacement after it.
#[derive(Debug, Clone)]
pub(crate) struct CloseContext {
    /// The tab being closed.
    pub closed: TabId,
    /// Its parent at close time.
    pub parent: Option<TabId>,
    /// The siblings that followed it, in order, at close time.
    pub siblings_after: Vec<TabId>,
    /// The visible order before the close.
    pub before: Vec<TabId>,
}

impl CloseContext {
    pub fn capture(arena: &NodeArena, visible: &[TabId], closed: TabId) -> Self {
        let slot = arena.slot_of(closed);
        let siblings_after = slot.map_or_else(Vec::new, |s| {
            arena
                .sibling_list(s.parent)
                .iter()
                .skip(s.index + 1)
                .copied()
                .collect()
        });
        Self {
            closed,
            parent: slot.and_then(|s| s.parent),
            siblings_after,
            before: visible.to_vec(),
        }
    }
}

/// Tracks focus recency and picks the replacement after a close.
#[derive(Debug, Default)]
pub(crate) struct SelectionPolicy {
    /// Focus history, most recent last, no duplicates.
    recency: Vec<TabId>,
}

impl SelectionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a focus change.
    pub fn record_focus(&mut self, id: TabId) {
        self.recency.retain(|&t| t != id);
        self.recency.push(id);
    }

    /// Drops history entries whose tabs no longer exist.
    pub fn prune(&mut self, arena: &NodeArena) {
        self.recency.retain(|&t| arena.contains(t));
    }

    /// Forgets all history. Used when a session snapshot is restored.
    pub fn clear(&mut self) {
        self.recency.clear();
    }

    /// Picks the tab to focus after `ctx.closed` was removed.
    ///
    /// `arena` is the post-close tree; a candidate must still be alive
    /// and not hidden inside a collapsed subtree. Returns `None` only
    /// when no tab is left to focus.
    pub fn pick(
        &self,
        arena: &NodeArena,
        directive: SelectOnRemove,
        ctx: &CloseContext,
    ) -> Option<TabId> {
        match directive {
            SelectOnRemove::Next => Self::pick_linear(arena, ctx, true),
            SelectOnRemove::Prev => Self::pick_linear(arena, ctx, false),
            SelectOnRemove::LastUsed => self
                .recency
                .iter()
                .rev()
                .find(|&&t| Self::selectable(arena, t))
                .copied()
                .or_else(|| Self::pick_linear(arena, ctx, true)),
            SelectOnRemove::Tree => Self::pick_tree(arena, ctx),
        }
    }

    /// Nearest selectable tab after (or before) the closed position,
    /// falling back to the other direction at the edge of the strip.
    fn pick_linear(arena: &NodeArena, ctx: &CloseContext, forward: bool) -> Option<TabId> {
        let at = ctx.before.iter().position(|&t| t == ctx.closed)?;
        let after = ctx.before[at + 1..].iter().copied();
        let before = ctx.before[..at].iter().rev().copied();
        let pick_from = |mut it: Box<dyn Iterator<Item = TabId>>| {
            it.find(|&t| Self::selectable(arena, t))
        };
        if forward {
            pick_from(Box::new(after)).or_else(|| pick_from(Box::new(before)))
        } else {
            pick_from(Box::new(before)).or_else(|| pick_from(Box::new(after)))
        }
    }

    /// Hierarchy-aware pick: next surviving sibling, then the former
    /// parent, then the nearest visible neighbor.
    fn pick_tree(arena: &NodeArena, ctx: &CloseContext) -> Option<TabId> {
        ctx.siblings_after
            .iter()
            .copied()
            .find(|&t| Self::selectable(arena, t))
            .or_else(|| ctx.parent.filter(|&p| Self::selectable(arena, p)))
            .or_else(|| Self::pick_linear(arena, ctx, true))
    }

    fn selectable(arena: &NodeArena, id: TabId) -> bool {
        arena.contains(id) && !arena.is_hidden(id)
    }
}
