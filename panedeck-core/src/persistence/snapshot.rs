//! Serialized form of a workspace
//!
//! Ordered maps become arrays (array order is display order) so the
//! snapshot is plain JSON that other execution contexts can read:
//!
//! ```json
//! {
//!   "version": 1,
//!   "activeScreenId": "…",
//!   "screens": [
//!     { "id": "…", "width": 50.0, "activeTabId": "…",
//!       "tabs": [{ "id": "…", "title": "Pages", "route": "/page/42", "icon": "mdi-file" }] }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::workspace::{
    InvariantViolation, Screen, ScreenId, Tab, TabId, Workspace, check_workspace, width,
};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

const fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// A persisted screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedScreen {
    /// Screen id
    pub id: ScreenId,
    /// Width percentage
    pub width: f64,
    /// Active tab id
    pub active_tab_id: Option<TabId>,
    /// Tabs in display order
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

/// A persisted workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    /// Format version; snapshots written before versioning read as 1.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Active screen id
    pub active_screen_id: Option<ScreenId>,
    /// Screens in display order
    pub screens: Vec<PersistedScreen>,
}

impl PersistedSnapshot {
    /// Captures a workspace.
    #[must_use]
    pub fn from_workspace(workspace: &Workspace) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            active_screen_id: workspace.active_screen_id(),
            screens: workspace
                .screens()
                .map(|screen| PersistedScreen {
                    id: screen.id,
                    width: screen.width(),
                    active_tab_id: screen.active_tab_id(),
                    tabs: screen.tabs().cloned().collect(),
                })
                .collect(),
        }
    }

    /// Rebuilds the workspace described by the snapshot.
    ///
    /// Widths that do not sum to 100 are rescaled; anything else that
    /// breaks the workspace invariants rejects the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error for a newer format version, an empty screen list,
    /// duplicate ids or dangling active ids.
    pub fn into_workspace(self) -> Result<Workspace, SnapshotError> {
        if self.version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        if self.screens.is_empty() {
            return Err(SnapshotError::NoScreens);
        }

        let mut screens = IndexMap::with_capacity(self.screens.len());
        for persisted in self.screens {
            let mut screen = Screen::new(persisted.id);
            for tab in persisted.tabs {
                let tab_id = tab.id;
                if screen.tabs.insert(tab_id, tab).is_some() {
                    return Err(InvariantViolation::DuplicateTab(tab_id).into());
                }
            }
            screen.active_tab_id = persisted.active_tab_id;
            screen.width = persisted.width;
            if screens.insert(persisted.id, screen).is_some() {
                return Err(InvariantViolation::DuplicateScreen(persisted.id).into());
            }
        }

        let mut workspace = Workspace {
            screens,
            active_screen_id: self.active_screen_id,
        };
        let widths_valid = workspace
            .screens
            .values()
            .all(|s| s.width.is_finite() && s.width > 0.0)
            && width::is_normalized(workspace.screens.values().map(Screen::width));
        if !widths_valid {
            width::normalize(workspace.screens.values_mut().map(|s| &mut s.width));
        }

        check_workspace(&workspace)?;
        Ok(workspace)
    }

    /// Encodes the snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(SnapshotError::Serialize)
    }

    /// Decodes a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(SnapshotError::Parse)
    }

    /// Decodes and validates a snapshot in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid snapshot.
    pub fn parse_workspace(json: &str) -> Result<Workspace, SnapshotError> {
        Self::from_json(json)?.into_workspace()
    }
}
