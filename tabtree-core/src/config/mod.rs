//! Configuration for tree tab behavior
//!
//! This module provides the policy knobs that control where new tabs are
//! inserted and which tab gets focused after a close, plus TOML
//! persistence for them.
//!
//! # Example
//!
//! ```
//! use tabtree_core::config::{NewTabPosition, SelectOnRemove, TreeSettings};
//!
//! let mut settings = TreeSettings::default();
//! settings.new_toplevel_position = NewTabPosition::First;
//! assert_eq!(settings.select_on_remove, SelectOnRemove::Next);
//! ```

mod settings;

pub use settings::{
    NewChildPosition, NewTabPosition, SelectOnRemove, SettingsError, TreeSettings,
    default_config_path,
};
