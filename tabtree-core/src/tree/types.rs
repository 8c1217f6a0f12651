//! Core type definitions for the tab tree
//!
//! This module contains the identifier and request types used throughout
//! the tree subsystem.

use std::fmt;
use uuid::Uuid;

/// Unique identifier for a tab in the tree.
///
/// A `TabId` is an opaque handle that stays valid for the lifetime of the
/// tab it names. Closing a tab invalidates its handle permanently; a tab
/// brought back by undo receives a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub Uuid);

impl TabId {
    /// Creates a new random tab ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// The page-level payload carried by a tab.
///
/// The tree only places tabs; navigation and rendering belong to an
/// external tab-content collaborator. `TabData` is the minimal state the
/// tree must preserve across close/undo and session round-trips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabData {
    /// The URL the tab is showing.
    pub url: String,
    /// The page title, as last reported by the content collaborator.
    pub title: String,
}

impl TabData {
    /// Creates tab data with the given URL and title.
    #[must_use]
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }

    /// Creates tab data with a URL and an empty title.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
        }
    }
}

/// How a newly opened tab relates to the reference tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenRelation {
    /// Open as a top-level tab, positioned by the unrelated-insert policy.
    Unrelated,
    /// Open as a child of the reference tab, positioned by the
    /// related-insert policy.
    Related,
    /// Open as a sibling of the reference tab, positioned by the
    /// sibling-insert policy.
    Sibling,
}

impl fmt::Display for OpenRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrelated => write!(f, "unrelated"),
            Self::Related => write!(f, "related"),
            Self::Sibling => write!(f, "sibling"),
        }
    }
}

/// Target of a structural move.
///
/// Step moves are counted against the *visible* order, so a collapsed
/// subtree is skipped as one unit. The landing parent is recomputed from
/// the final position, which is how a single step can carry a tab into
/// (or out of) a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Move so the tab ends up at this visible index.
    Absolute(usize),
    /// Move by a signed number of steps in the visible order.
    Relative(isize),
    /// Move up one level: become the next sibling of the former parent.
    Promote,
    /// Move down one level: become the last child of the preceding sibling.
    Demote,
}

/// Per-call override for which tab gets focused after a close.
///
/// An override applies to a single close call only and never mutates the
/// configured [`SelectOnRemove`](crate::config::SelectOnRemove) default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOverride {
    /// Select the next visible tab.
    Next,
    /// Select the previous visible tab.
    Prev,
    /// Select in the direction opposite to the configured default.
    ///
    /// Has no meaning when the configured default is `last-used`.
    Opposite,
}
