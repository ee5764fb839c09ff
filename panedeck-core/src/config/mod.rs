//! Settings for the workspace core
//!
//! [`SettingsManager`] reads and writes [`WorkspaceSettings`] as TOML in the
//! platform configuration directory.

mod manager;
mod settings;

pub use manager::SettingsManager;
pub use settings::{MAX_DRAG_THRESHOLD_PX, WorkspaceSettings};
