//! CLI error types and exit codes.

use panedeck_core::error::{
    ConfigError, NavigationError, PanedeckError, SnapshotError, StorageError,
};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, storage or other failures
    pub const GENERAL_ERROR: i32 = 1;
    /// A screen, tab or route could not be found
    pub const NOT_FOUND: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Screen not found
    #[error("Screen not found: {0}")]
    ScreenNotFound(String),

    /// Tab not found
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    /// An id prefix matches several items
    #[error("Ambiguous {kind} id '{prefix}'. Matches: {matches}")]
    Ambiguous {
        /// "screen" or "tab"
        kind: &'static str,
        /// The prefix given
        prefix: String,
        /// Comma-separated matching ids
        matches: String,
    },

    /// Navigation error
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// The workspace refused the operation
    #[error("{0}")]
    Rejected(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PanedeckError> for CliError {
    fn from(err: PanedeckError) -> Self {
        match err {
            PanedeckError::Storage(e) => e.into(),
            PanedeckError::Snapshot(e) => e.into(),
            PanedeckError::Navigation(e) => e.into(),
            PanedeckError::Config(e) => e.into(),
        }
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<SnapshotError> for CliError {
    fn from(err: SnapshotError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<NavigationError> for CliError {
    fn from(err: NavigationError) -> Self {
        Self::Navigation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, storage, rejected operation, IO)
    /// - 2: Not found (unknown screen, tab or route)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ScreenNotFound(_) | Self::TabNotFound(_) | Self::Navigation(_) => {
                exit_codes::NOT_FOUND
            }
            Self::Config(_)
            | Self::Storage(_)
            | Self::Ambiguous { .. }
            | Self::Rejected(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
