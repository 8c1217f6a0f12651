//! Error types for tab tree operations
//!
//! This module defines the error enum shared by all tree operations and
//! the result enum returned by `close`.

use super::types::TabId;

/// Errors that can occur during tab tree operations.
///
/// Every operation that returns one of these leaves the tree unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The tab handle does not name a live tab.
    #[error("tab not found: {0}")]
    TabNotFound(TabId),

    /// The tab is hidden inside a collapsed subtree and the operation
    /// needs a visible position for it.
    #[error("tab is not visible: {0}")]
    TabNotVisible(TabId),

    /// A move target index falls outside the visible order.
    #[error("move target {index} out of range (visible tabs: {len})")]
    MoveOutOfRange {
        /// The requested visible index.
        index: isize,
        /// The number of currently visible tabs.
        len: usize,
    },

    /// The move would leave the tab exactly where it is.
    #[error("move would not change the position of {0}")]
    MoveWouldNotChange(TabId),

    /// Promote was requested for a tab that is already top-level.
    #[error("cannot promote a top-level tab: {0}")]
    CannotPromoteRoot(TabId),

    /// Demote was requested for a tab with no preceding sibling.
    #[error("tab has no preceding sibling to demote into: {0}")]
    NoPrecedingSibling(TabId),

    /// Undo was requested with an empty undo stack.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The related-insert policy is configured as `first`, whose
    /// semantics are deliberately left undefined (TBD upstream).
    #[error("related-first insertion is not implemented")]
    RelatedFirstUnsupported,

    /// The `opposite` selection override was used while the configured
    /// default is `last-used`, which has no opposite direction.
    #[error("select-on-remove 'last-used' has no opposite direction")]
    NoOppositeForLastUsed,
}

/// Result of a close request.
///
/// A close that would touch pinned tabs without `force` does not fail:
/// it reports the pinned tabs so an external prompt collaborator can
/// confirm and retry with `force = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab (or subtree) was closed.
    Closed {
        /// The tab that holds focus after the close, if any tab remains.
        focus: Option<TabId>,
    },
    /// Pinned tabs are in scope and `force` was false; nothing was closed.
    ConfirmationRequired {
        /// The pinned tabs the close would remove.
        pinned: Vec<TabId>,
    },
}

impl CloseOutcome {
    /// Returns true if the close actually happened.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    /// Returns the pinned tabs blocking the close, if any.
    #[must_use]
    pub fn pinned(&self) -> &[TabId] {
        match self {
            Self::Closed { .. } => &[],
            Self::ConfirmationRequired { pinned } => pinned,
        }
    }

    /// Returns the post-close focus if the close happened.
    #[must_use]
    pub const fn focus(&self) -> Option<TabId> {
        match self {
            Self::Closed { focus } => *focus,
            Self::ConfirmationRequired { .. } => None,
        }
    }
}
