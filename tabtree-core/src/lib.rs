//! `TabTree` Core Library
//!
//! This crate provides the core functionality for tree-structured tab
//! management: a forest-shaped tab model with relative opens, subtree
//! moves, collapse, close-with-undo, pinned-tab protection and session
//! persistence.
//!
//! # Crate Structure
//!
//! - [`tree`] - The tab tree model and its supporting types
//! - [`config`] - Placement and selection policy settings, TOML persistence
//! - [`session`] - Handle-free session snapshots, JSON persistence
//! - [`tracing`] - Structured logging setup for embedders
//!
//! # Example
//!
//! ```
//! use tabtree_core::{OpenRelation, TabData, TreeModel};
//!
//! let mut model = TreeModel::new();
//! let page = model
//!     .open(TabData::from_url("https://example.org"), OpenRelation::Unrelated, false)
//!     .unwrap();
//! let link = model
//!     .open(TabData::from_url("https://example.org/a"), OpenRelation::Related, false)
//!     .unwrap();
//!
//! // Closing the parent promotes the child into its place.
//! let outcome = model.close(page, false, false).unwrap();
//! assert!(outcome.is_closed());
//! assert_eq!(model.roots(), &[link]);
//!
//! // And undo brings the parent back, re-adopting the child.
//! let restored = model.undo_close().unwrap();
//! assert_eq!(model.get(link).unwrap().parent(), Some(restored));
//! ```

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod config;
pub mod session;
pub mod tracing;
pub mod tree;

// =============================================================================
// Convenience re-exports
//
// These flat re-exports cover the types most embedders touch. New code
// inside the workspace should prefer the modular paths (e.g.
// `tabtree_core::tree::TreeModel`) over the flat namespace.
// =============================================================================

pub use config::{
    NewChildPosition, NewTabPosition, SelectOnRemove, SettingsError, TreeSettings,
    default_config_path,
};
pub use session::{SESSION_VERSION, SessionError, SessionSnapshot, TabSnapshot};
pub use tree::{
    CloseOutcome, MoveTarget, Node, OpenRelation, RenderedTab, SelectOverride, TabData, TabId,
    TreeError, TreeModel,
};
