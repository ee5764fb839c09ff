//! Error types for the boundaries of the workspace core
//!
//! The workspace model itself never fails: stale ids yield `None`. Errors
//! only arise where the core talks to the outside world (durable storage,
//! snapshot parsing, the router and the settings file).

use std::path::PathBuf;

use thiserror::Error;

use crate::workspace::InvariantViolation;

/// Errors raised by a [`KeyValueStore`](crate::persistence::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a key failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        /// The key being accessed
        key: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backing store.
    #[error("invalid storage key: '{0}'")]
    InvalidKey(String),

    /// Watching the backing store for external changes failed.
    #[error("failed to watch storage: {0}")]
    Watch(#[from] notify::Error),
}

/// Errors raised while encoding or decoding a workspace snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot could not be encoded.
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The stored text is not a snapshot.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[source] serde_json::Error),

    /// The snapshot was written by a newer version.
    #[error("unsupported snapshot version {found} (supported up to {supported})")]
    UnsupportedVersion {
        /// Version found in the snapshot
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// The snapshot holds no screens.
    #[error("snapshot has no screens")]
    NoScreens,

    /// The snapshot describes an inconsistent workspace.
    #[error("invalid snapshot: {0}")]
    Invalid(#[from] InvariantViolation),
}

/// Errors raised by a [`Router`](crate::route_sync::Router).
#[derive(Debug, Error)]
pub enum NavigationError {
    /// No route matches the target.
    #[error("no route matches '{0}'")]
    NotFound(String),

    /// The router refused the navigation (guard, permissions, ...).
    #[error("navigation to '{to}' was rejected: {reason}")]
    Rejected {
        /// Requested target
        to: String,
        /// Reason given by the router
        reason: String,
    },

    /// The session bootstrap was abandoned before it completed.
    #[error("session bootstrap was abandoned before completing")]
    BootstrapAbandoned,
}

/// Errors raised while loading or saving settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the settings file failed.
    #[error("settings I/O error at {path}: {source}")]
    Io {
        /// Settings file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the settings schema.
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// The settings could not be encoded.
    #[error("failed to serialize settings: {0}")]
    Serialize(String),

    /// A setting holds an out-of-range value.
    #[error("invalid setting '{field}': {reason}")]
    Validation {
        /// Offending field
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// No platform configuration directory could be determined.
    #[error("could not determine the configuration directory")]
    NoConfigDir,
}

/// Any error raised by the workspace core.
#[derive(Debug, Error)]
pub enum PanedeckError {
    /// Storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Snapshot failure
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// Navigation failure
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// Settings failure
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for any core operation.
pub type PanedeckResult<T> = Result<T, PanedeckError>;
