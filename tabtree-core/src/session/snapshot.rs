//! Snapshot data types and JSON persistence

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Current snapshot format version.
pub const SESSION_VERSION: u32 = 1;

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Snapshot file could not be read or written.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot is not valid JSON or has an unexpected shape.
    #[error("session format error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot was written by a newer format version.
    #[error("unsupported session version {found} (newest supported: {SESSION_VERSION})")]
    UnsupportedVersion {
        /// The version found in the snapshot.
        found: u32,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// One tab in a snapshot, with its subtree nested inside it.
///
/// Default-valued fields are omitted from the serialized form, so a
/// snapshot of a flat uncollapsed session stays compact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabSnapshot {
    /// The URL the tab was showing.
    pub url: String,
    /// The page title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Whether the subtree was collapsed. Preserved even for childless
    /// tabs so a snapshot round-trip is exact.
    #[serde(default, skip_serializing_if = "is_false")]
    pub collapsed: bool,
    /// Whether the tab was pinned.
    #[serde(default, skip_serializing_if = "is_false")]
    pub pinned: bool,
    /// Child tabs in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TabSnapshot>,
}

impl TabSnapshot {
    /// Creates a leaf snapshot with just a URL.
    #[must_use]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Number of tabs in this snapshot including itself.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TabSnapshot::count).sum::<usize>()
    }
}

/// A whole-session snapshot: the top-level tabs with their subtrees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Format version, for forward-compatibility checks on load.
    pub version: u32,
    /// Top-level tabs in order.
    pub tabs: Vec<TabSnapshot>,
}

impl SessionSnapshot {
    /// Creates a snapshot at the current format version.
    #[must_use]
    pub fn new(tabs: Vec<TabSnapshot>) -> Self {
        Self {
            version: SESSION_VERSION,
            tabs,
        }
    }

    /// Total number of tabs in the snapshot.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tabs.iter().map(TabSnapshot::count).sum()
    }

    /// Serializes the snapshot to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot from JSON, rejecting newer format versions.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or an unsupported version.
    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        let snapshot: Self = serde_json::from_str(text)?;
        if snapshot.version > SESSION_VERSION {
            return Err(SessionError::UnsupportedVersion {
                found: snapshot.version,
            });
        }
        Ok(snapshot)
    }

    /// Writes the snapshot to a file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reads a snapshot from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
