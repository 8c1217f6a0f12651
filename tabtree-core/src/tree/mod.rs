//! Tree-structured tab hierarchy
//!
//! This module provides the core data model for tree tabs: tabs are
//! nodes in an ordered forest, opened relative to an existing tab and
//! rendered as an indented flat list. Subtrees can be collapsed, moved
//! as a unit, closed and brought back by undo.
//!
//! # Architecture
//!
//! - **Opaque handles**: tabs are named by [`TabId`]; handles die with
//!   their tab and undo restores tabs under fresh handles
//! - **Derived visibility**: the flat visible order is recomputed from
//!   the forest after every change, never edited directly
//! - **Validate, then mutate**: operations check their inputs first, so
//!   an error always leaves the model unchanged
//!
//! # Module Structure
//!
//! - `types` - Core type definitions (`TabId`, `TabData`, `OpenRelation`, `MoveTarget`)
//! - `arena` - Node storage (`Node`, `NodeArena`)
//! - `visibility` - Flattened visible order and tree-gutter rendering
//! - `position` - Insertion point resolution for new tabs
//! - `undo` - Closure records and the undo stack
//! - `selection` - Post-close focus selection
//! - `model` - The tab tree model (`TreeModel`)
//! - `error` - Error types (`TreeError`, `CloseOutcome`)
//!
//! # Example
//!
//! ```
//! use tabtree_core::tree::{TreeModel, TabData, OpenRelation};
//!
//! let mut model = TreeModel::new();
//!
//! let parent = model
//!     .open(TabData::from_url("https://example.org"), OpenRelation::Unrelated, false)
//!     .unwrap();
//! let child = model
//!     .open(TabData::from_url("https://example.org/a"), OpenRelation::Related, false)
//!     .unwrap();
//!
//! // The child nests under the parent and holds focus.
//! assert_eq!(model.get(child).unwrap().parent(), Some(parent));
//! assert_eq!(model.focused(), Some(child));
//! assert_eq!(model.visible_order(), &[parent, child]);
//! ```

mod arena;
mod error;
mod model;
mod position;
mod selection;
mod types;
mod undo;
mod visibility;

pub use arena::Node;
pub use error::{CloseOutcome, TreeError};
pub use model::TreeModel;
pub use types::{MoveTarget, OpenRelation, SelectOverride, TabData, TabId};
pub use visibility::RenderedTab;
