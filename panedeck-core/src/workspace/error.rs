//! Invariant reporting for the workspace model
//!
//! Store operations never fail for stale or unknown ids (they return `None`
//! instead). The only error type here describes a broken structural
//! invariant, which [`WorkspaceStore::check_invariants`] reports.
//!
//! [`WorkspaceStore::check_invariants`]: super::WorkspaceStore::check_invariants

use super::types::{ScreenId, TabId};

/// A violated workspace invariant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// The workspace has no screens.
    #[error("workspace has no screens")]
    NoScreens,

    /// The active screen id does not name a live screen.
    #[error("active screen {0} does not exist")]
    ActiveScreenMissing(ScreenId),

    /// Screens exist but none is active.
    #[error("no active screen")]
    NoActiveScreen,

    /// A screen's active tab is not one of its tabs.
    #[error("active tab {tab_id} is not part of screen {screen_id}")]
    ActiveTabMissing {
        /// The screen holding the dangling reference.
        screen_id: ScreenId,
        /// The missing tab.
        tab_id: TabId,
    },

    /// A screen with tabs has no active tab.
    #[error("screen {0} has tabs but no active tab")]
    NoActiveTab(ScreenId),

    /// The same screen id appears more than once.
    #[error("screen {0} appears more than once")]
    DuplicateScreen(ScreenId),

    /// The same tab id appears more than once in the workspace.
    #[error("tab {0} appears more than once")]
    DuplicateTab(TabId),

    /// Screen widths do not sum to 100.
    #[error("screen widths sum to {0}, expected 100")]
    WidthSum(f64),
}
