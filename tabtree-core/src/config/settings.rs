//! Tree tab settings and TOML persistence

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors that can occur while loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file could not be read or written.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML.
    #[error("settings parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be serialized to TOML.
    #[error("settings serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No configuration directory is available on this system.
    #[error("could not determine configuration directory")]
    NoConfigDir,
}

/// Where a new top-level or sibling tab is inserted in its sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewTabPosition {
    /// Insert at the start of the sibling list.
    First,
    /// Append at the end of the sibling list.
    Last,
    /// Insert right after the pivot tab.
    Next,
    /// Insert right before the pivot tab.
    Prev,
}

/// Where a new child tab is inserted among its parent's children.
///
/// `First` is reserved: its exact semantics are still undecided upstream,
/// so resolving a position with it fails rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NewChildPosition {
    /// Insert as the first child. Currently rejected at resolve time.
    First,
    /// Append as the last child.
    Last,
}

/// Which tab gets focused after the focused tab is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectOnRemove {
    /// The next tab in the visible order.
    Next,
    /// The previous tab in the visible order.
    Prev,
    /// The most recently focused tab that is still alive.
    LastUsed,
    /// Hierarchy-aware: next sibling, then parent, then visible neighbor.
    Tree,
}

fn default_toplevel() -> NewTabPosition {
    NewTabPosition::Last
}

fn default_sibling() -> NewTabPosition {
    NewTabPosition::Next
}

fn default_child() -> NewChildPosition {
    NewChildPosition::Last
}

fn default_select() -> SelectOnRemove {
    SelectOnRemove::Next
}

/// Policy settings for tab placement and post-close selection.
///
/// Each axis is independent and serialized under a kebab-case key, so a
/// settings file only needs to name the axes it changes:
///
/// ```toml
/// new-toplevel-position = "first"
/// select-on-remove = "tree"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TreeSettings {
    /// Placement of new top-level (unrelated) tabs among the roots.
    #[serde(default = "default_toplevel")]
    pub new_toplevel_position: NewTabPosition,

    /// Placement of new sibling tabs in the reference tab's sibling list.
    #[serde(default = "default_sibling")]
    pub new_sibling_position: NewTabPosition,

    /// Placement of new child (related) tabs among the parent's children.
    #[serde(default = "default_child")]
    pub new_child_position: NewChildPosition,

    /// Which tab gets focused after the focused tab is closed.
    #[serde(default = "default_select")]
    pub select_on_remove: SelectOnRemove,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            new_toplevel_position: default_toplevel(),
            new_sibling_position: default_sibling(),
            new_child_position: default_child(),
            select_on_remove: default_select(),
        }
    }
}

impl TreeSettings {
    /// Loads settings from a TOML file.
    ///
    /// A missing file yields the defaults; axes absent from the file keep
    /// their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Saves settings to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

/// Returns the default settings file path.
///
/// # Errors
///
/// Returns an error if no configuration directory is available.
pub fn default_config_path() -> Result<PathBuf, SettingsError> {
    dirs::config_dir()
        .map(|dir| dir.join("tabtree").join("settings.toml"))
        .ok_or(SettingsError::NoConfigDir)
}
