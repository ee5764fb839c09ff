//! Workspace settings
//!
//! Stored as TOML. Every field has a default, so a partial or missing file
//! yields usable settings:
//!
//! ```toml
//! min_screen_width_percent = 10.0
//! drag_threshold_px = 4.0
//! storage_key = "panedeck.workspace"
//! log_level = "info"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::drag::DEFAULT_DRAG_THRESHOLD_PX;
use crate::error::{ConfigError, ConfigResult};
use crate::persistence::DEFAULT_STORAGE_KEY;
use crate::tracing::TracingLevel;
use crate::workspace::MIN_SCREEN_WIDTH_PERCENT;

/// Largest accepted drag threshold, in pixels.
pub const MAX_DRAG_THRESHOLD_PX: f64 = 64.0;

const fn default_min_width() -> f64 {
    MIN_SCREEN_WIDTH_PERCENT
}

const fn default_drag_threshold() -> f64 {
    DEFAULT_DRAG_THRESHOLD_PX
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// User settings for the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Smallest width a screen may be resized to, in percent
    #[serde(default = "default_min_width")]
    pub min_screen_width_percent: f64,
    /// Pointer travel before a press becomes a tab drag, in pixels
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    /// Key the workspace snapshot is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Directory of the file store; `None` uses the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// Log level
    pub log_level: TracingLevel,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            min_screen_width_percent: MIN_SCREEN_WIDTH_PERCENT,
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            storage_key: default_storage_key(),
            storage_dir: None,
            log_level: TracingLevel::default(),
        }
    }
}

impl WorkspaceSettings {
    /// Checks that every value is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first bad field.
    pub fn validate(&self) -> ConfigResult<()> {
        let min = self.min_screen_width_percent;
        if !min.is_finite() || min <= 0.0 || min >= 50.0 {
            return Err(invalid(
                "min_screen_width_percent",
                format!("{min} is outside (0, 50)"),
            ));
        }

        let threshold = self.drag_threshold_px;
        if !threshold.is_finite() || !(0.0..=MAX_DRAG_THRESHOLD_PX).contains(&threshold) {
            return Err(invalid(
                "drag_threshold_px",
                format!("{threshold} is outside [0, {MAX_DRAG_THRESHOLD_PX}]"),
            ));
        }

        if self.storage_key.is_empty() {
            return Err(invalid("storage_key", "must not be empty"));
        }
        if self.storage_key.starts_with('.')
            || self
                .storage_key
                .chars()
                .any(|c| matches!(c, '/' | '\\') || c.is_control())
        {
            return Err(invalid(
                "storage_key",
                "must not start with a dot or contain path separators or control characters",
            ));
        }
        Ok(())
    }

    /// Parses settings from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings TOML.
    pub fn from_toml(text: &str) -> ConfigResult<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Encodes the settings as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.to_string(),
        reason: reason.into(),
    }
}
